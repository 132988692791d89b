//! Line-oriented front end over a [`SubmissionCoordinator`].

pub mod commands;
pub mod config;
pub mod render;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use codeport_engine::SubmissionCoordinator;
use codeport_logging::{cp_info, cp_warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use commands::{parse, Command};

const PROMPT: &str = "codeport> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell<W: Write> {
    coordinator: SubmissionCoordinator,
    output_dir: PathBuf,
    out: W,
}

impl Shell<io::Stdout> {
    pub fn new(coordinator: SubmissionCoordinator, output_dir: PathBuf) -> Self {
        Self::with_output(coordinator, output_dir, io::stdout())
    }

    /// Reads commands from stdin until `quit` or end of input.
    pub async fn run(mut self) -> io::Result<()> {
        writeln!(self.out, "Type `help` for commands.")?;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            if self.handle_line(&line).await? == Flow::Quit {
                break;
            }
        }
        self.coordinator.teardown();
        cp_info!("Shell closed");
        Ok(())
    }
}

impl<W: Write> Shell<W> {
    pub fn with_output(coordinator: SubmissionCoordinator, output_dir: PathBuf, out: W) -> Self {
        Self {
            coordinator,
            output_dir,
            out,
        }
    }

    pub fn coordinator(&self) -> &SubmissionCoordinator {
        &self.coordinator
    }

    pub async fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        match parse(line) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => Ok(Flow::Continue),
            Err(err) => {
                writeln!(self.out, "{err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    pub async fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Zip(path) => self.select_zip(&path).await?,
            Command::Repo(url) => {
                // Validation failures land in the status line printed below.
                let _ = self.coordinator.set_remote_repo(&url).await;
            }
            Command::Lang(language) => {
                self.coordinator.set_target_language(language).await;
                let label = language.map_or_else(|| "none".to_string(), |l| l.to_string());
                writeln!(self.out, "Target language: {label}")?;
            }
            Command::Submit => {
                let language = self.coordinator.state().target_language();
                let _ = self.coordinator.submit(language).await;
            }
            Command::Reprocess => {
                let language = self.coordinator.state().target_language();
                let _ = self.coordinator.reprocess(language).await;
            }
            Command::List => {
                writeln!(self.out, "{}", render::entry_list(self.coordinator.entries()))?;
            }
            Command::Show(number) => match self.coordinator.select_entry(number - 1).await {
                Some(selection) => {
                    let text = render::selection(selection);
                    writeln!(self.out, "{text}")?;
                }
                None => writeln!(self.out, "No entry {number}.")?,
            },
            Command::Open => {
                self.coordinator.open_preview();
                writeln!(self.out, "{}", render::selection(self.coordinator.preview()))?;
            }
            Command::Close => {
                self.coordinator.close_preview();
                writeln!(self.out, "{}", render::selection(self.coordinator.preview()))?;
            }
            Command::Save { entry, dir } => {
                let dir = dir.unwrap_or_else(|| self.output_dir.clone());
                match self.coordinator.download_entry(entry - 1, &dir).await {
                    Ok(path) => writeln!(self.out, "Saved {}", path.display())?,
                    Err(err) => writeln!(self.out, "Cannot save entry {entry}: {err}")?,
                }
            }
            Command::Download(dir) => {
                let dir = dir.unwrap_or_else(|| self.output_dir.clone());
                match self.coordinator.download(&dir) {
                    Ok(path) => writeln!(self.out, "Saved {}", path.display())?,
                    Err(err) => writeln!(self.out, "Cannot download: {err}")?,
                }
            }
            Command::Status => {
                writeln!(self.out, "{}", render::summary(&self.coordinator.view()))?;
                self.coordinator.consume_dirty();
            }
            Command::Help => writeln!(self.out, "{}", render::HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }

        if self.coordinator.consume_dirty() {
            if let Some(line) = render::status_line(&self.coordinator.view()) {
                writeln!(self.out, "{line}")?;
            }
        }
        Ok(Flow::Continue)
    }

    async fn select_zip(&mut self, path: &Path) -> io::Result<()> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                cp_warn!("Failed to read {:?}: {}", path, err);
                return writeln!(self.out, "Cannot read {}: {err}", path.display());
            }
        };
        let name = path
            .file_name()
            .map_or_else(|| "archive.zip".to_string(), |n| n.to_string_lossy().into_owned());
        writeln!(self.out, "Selected {name} ({} bytes)", bytes.len())?;
        self.coordinator
            .select_local_archive(name, Bytes::from(bytes))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use codeport_core::{SessionState, SubmissionRequest};
    use codeport_engine::{AnalysisBackend, BackendResponse, DispatchError};
    use tempfile::TempDir;

    /// Answers every request with the same body and counts calls.
    #[derive(Clone, Default)]
    struct FixedBackend {
        calls: Arc<AtomicUsize>,
        body: Bytes,
    }

    #[async_trait::async_trait]
    impl AnalysisBackend for FixedBackend {
        async fn dispatch(
            &self,
            _request: &SubmissionRequest,
        ) -> Result<BackendResponse, DispatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(BackendResponse {
                bytes: self.body.clone(),
                content_disposition: None,
                content_type: Some("application/zip".to_string()),
            })
        }
    }

    fn shell(backend: &FixedBackend, output_dir: &Path) -> Shell<Vec<u8>> {
        let coordinator =
            SubmissionCoordinator::new(Box::new(backend.clone()), SessionState::new());
        Shell::with_output(coordinator, output_dir.to_path_buf(), Vec::new())
    }

    fn take_output(shell: &mut Shell<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(&mut shell.out)).unwrap()
    }

    #[tokio::test]
    async fn submit_without_input_reports_and_skips_backend() {
        let temp = TempDir::new().unwrap();
        let backend = FixedBackend::default();
        let mut shell = shell(&backend, temp.path());

        let flow = shell.handle_line("submit").await.unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(
            take_output(&mut shell),
            "[error] Please select a ZIP file or enter a repository URL first.\n"
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unreadable_zip_path_is_reported() {
        let temp = TempDir::new().unwrap();
        let backend = FixedBackend::default();
        let mut shell = shell(&backend, temp.path());

        shell.handle_line("zip missing.zip").await.unwrap();

        assert!(take_output(&mut shell).starts_with("Cannot read missing.zip"));
        assert!(shell.coordinator().state().input().source().is_none());
    }

    #[tokio::test]
    async fn submitted_result_can_be_downloaded() {
        let temp = TempDir::new().unwrap();
        let upload = temp.path().join("legacy.zip");
        std::fs::write(&upload, b"upload").unwrap();
        let backend = FixedBackend {
            body: Bytes::from_static(b"result bytes"),
            ..FixedBackend::default()
        };
        let mut shell = shell(&backend, &temp.path().join("out"));

        shell
            .handle_line(&format!("zip {}", upload.display()))
            .await
            .unwrap();
        shell.handle_line("lang java").await.unwrap();
        shell.handle_line("submit").await.unwrap();
        let output = take_output(&mut shell);
        assert!(output.contains("Selected legacy.zip (6 bytes)"));
        assert!(output.contains("Target language: Java"));
        // The body is not a ZIP, so only the preview fails.
        assert!(output.ends_with("[error] Error processing ZIP for preview.\n"));

        shell.handle_line("download").await.unwrap();
        let saved = temp.path().join("out").join("analysis_results.zip");
        assert_eq!(std::fs::read(&saved).unwrap(), b"result bytes");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn parse_errors_are_printed_and_quit_stops() {
        let temp = TempDir::new().unwrap();
        let backend = FixedBackend::default();
        let mut shell = shell(&backend, temp.path());

        shell.handle_line("lang cobol").await.unwrap();
        assert_eq!(
            take_output(&mut shell),
            "unknown target language: cobol\n"
        );
        assert_eq!(shell.handle_line("quit").await.unwrap(), Flow::Quit);
    }
}
