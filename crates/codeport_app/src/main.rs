mod cli;
mod shell;

use std::process::ExitCode;

use clap::Parser;
use codeport_core::SessionState;
use codeport_engine::{ReqwestBackend, SubmissionCoordinator};
use codeport_logging::{cp_error, cp_info, DEFAULT_LOG_FILE};

use cli::Cli;
use shell::config::AppConfig;
use shell::Shell;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    codeport_logging::initialize(
        cli.log.into(),
        cli.level(),
        std::path::Path::new(DEFAULT_LOG_FILE),
    );

    let config = AppConfig::load(cli.config.as_deref()).with_overrides(&cli);
    cp_info!(
        "Starting codeport against {} (output {})",
        config.server_url,
        config.output_dir.display()
    );

    let backend = match ReqwestBackend::new(config.backend_settings()) {
        Ok(backend) => backend,
        Err(err) => {
            cp_error!("Failed to create HTTP client: {}", err);
            eprintln!("codeport: cannot create HTTP client: {err}");
            return ExitCode::FAILURE;
        }
    };
    let coordinator = SubmissionCoordinator::new(
        Box::new(backend),
        SessionState::with_repo_prefix(config.repo_prefix.clone()),
    );

    match Shell::new(coordinator, config.output_dir).run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            cp_error!("Shell terminated: {}", err);
            eprintln!("codeport: {err}");
            ExitCode::FAILURE
        }
    }
}
