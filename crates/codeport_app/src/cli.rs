use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use codeport_logging::LogDestination;
use log::LevelFilter;

/// Interactive client for the code analysis service.
#[derive(Debug, Parser)]
#[command(name = "codeport", version, about)]
pub struct Cli {
    /// RON settings file. Defaults to ./codeport.ron when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the analysis server.
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Directory downloads are written to.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Where log records go.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log at debug level.
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    pub fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse() {
        let cli = Cli::parse_from([
            "codeport",
            "--server",
            "http://analysis:9000",
            "--log",
            "both",
            "-v",
        ]);
        assert_eq!(cli.server.as_deref(), Some("http://analysis:9000"));
        assert_eq!(cli.log, LogTarget::Both);
        assert_eq!(cli.level(), LevelFilter::Debug);
        assert!(cli.config.is_none());
    }

    #[test]
    fn defaults_log_to_file_at_info() {
        let cli = Cli::parse_from(["codeport"]);
        assert_eq!(cli.log, LogTarget::File);
        assert_eq!(cli.level(), LevelFilter::Info);
    }
}
