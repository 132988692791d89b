//! Settings file for the shell, stored as RON.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use codeport_core::DEFAULT_REPO_PREFIX;
use codeport_engine::BackendSettings;
use codeport_logging::{cp_info, cp_warn};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

pub const CONFIG_FILENAME: &str = "codeport.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub repo_prefix: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_mib: u64,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let backend = BackendSettings::default();
        Self {
            server_url: backend.base_url,
            repo_prefix: DEFAULT_REPO_PREFIX.to_string(),
            connect_timeout_secs: backend.connect_timeout.as_secs(),
            request_timeout_secs: backend.request_timeout.as_secs(),
            max_response_mib: backend.max_bytes / (1024 * 1024),
            output_dir: PathBuf::from("downloads"),
        }
    }
}

impl AppConfig {
    /// Reads `path`, or `./codeport.ron` when no path is given. A missing
    /// file yields defaults; an unreadable or malformed one is logged and
    /// also yields defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map_or_else(|| PathBuf::from(CONFIG_FILENAME), Path::to_path_buf);
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Self::default();
            }
            Err(err) => {
                cp_warn!("Failed to read settings from {:?}: {}", path, err);
                return Self::default();
            }
        };

        match ron::from_str(&content) {
            Ok(config) => {
                cp_info!("Loaded settings from {:?}", path);
                config
            }
            Err(err) => {
                cp_warn!("Failed to parse settings from {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    /// Command-line flags win over the file.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(server) = &cli.server {
            self.server_url = server.clone();
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        self
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.server_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_mib.saturating_mul(1024 * 1024),
        }
    }
}
