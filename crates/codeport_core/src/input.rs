use bytes::Bytes;
use url::Url;

/// Prefix every remote repository reference must carry unless configured otherwise.
pub const DEFAULT_REPO_PREFIX: &str = "https://github.com/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    LocalArchive,
    RemoteRepo,
}

/// The input a submission is built from. Exactly one variant is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    LocalArchive { bytes: Bytes, name: String },
    RemoteRepo { url: String },
}

impl InputSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            InputSource::LocalArchive { .. } => SourceKind::LocalArchive,
            InputSource::RemoteRepo { .. } => SourceKind::RemoteRepo,
        }
    }

    /// Short human label: the archive name or the repository URL.
    pub fn label(&self) -> &str {
        match self {
            InputSource::LocalArchive { name, .. } => name,
            InputSource::RemoteRepo { url } => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a ZIP file or enter a repository URL first.")]
    NoInput,
    #[error("Invalid repository URL: {url}. It must start with \"{prefix}\".")]
    InvalidRepoUrl { url: String, prefix: String },
    #[error("Nothing to reprocess.")]
    NothingToReprocess,
}

/// Holds the active input and keeps the two input modes mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSelector {
    source: Option<InputSource>,
    repo_prefix: String,
}

impl Default for InputSelector {
    fn default() -> Self {
        Self::new(DEFAULT_REPO_PREFIX)
    }
}

impl InputSelector {
    pub fn new(repo_prefix: impl Into<String>) -> Self {
        Self {
            source: None,
            repo_prefix: repo_prefix.into(),
        }
    }

    /// Selects a local archive, replacing any remote repository reference.
    pub fn set_local_archive(&mut self, name: impl Into<String>, bytes: Bytes) {
        self.source = Some(InputSource::LocalArchive {
            bytes,
            name: name.into(),
        });
    }

    /// Selects a remote repository, replacing any local archive.
    ///
    /// A rejected reference leaves the current selection untouched.
    pub fn set_remote_repo(&mut self, url: &str) -> Result<(), ValidationError> {
        let url = validate_repo_url(url, &self.repo_prefix)?;
        self.source = Some(InputSource::RemoteRepo { url });
        Ok(())
    }

    pub fn clear(&mut self) {
        self.source = None;
    }

    pub fn source(&self) -> Option<&InputSource> {
        self.source.as_ref()
    }

    pub fn kind(&self) -> Option<SourceKind> {
        self.source.as_ref().map(InputSource::kind)
    }

    pub fn repo_prefix(&self) -> &str {
        &self.repo_prefix
    }
}

/// Checks that `raw` is a well-formed URL under `prefix` naming something
/// beyond the prefix itself. Returns the trimmed reference.
pub fn validate_repo_url(raw: &str, prefix: &str) -> Result<String, ValidationError> {
    let candidate = raw.trim();
    let invalid = || ValidationError::InvalidRepoUrl {
        url: candidate.to_string(),
        prefix: prefix.to_string(),
    };

    let rest = candidate.strip_prefix(prefix).ok_or_else(invalid)?;
    if rest.trim_matches('/').is_empty() {
        return Err(invalid());
    }
    Url::parse(candidate).map_err(|_| invalid())?;
    Ok(candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_url_requires_prefix() {
        let err = validate_repo_url("https://example.com/org/repo", DEFAULT_REPO_PREFIX)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid repository URL: https://example.com/org/repo. It must start with \"https://github.com/\"."
        );
    }

    #[test]
    fn repo_url_is_trimmed() {
        assert_eq!(
            validate_repo_url("  https://github.com/org/repo \n", DEFAULT_REPO_PREFIX),
            Ok("https://github.com/org/repo".to_string())
        );
    }

    #[test]
    fn bare_prefix_is_rejected() {
        assert!(validate_repo_url("https://github.com/", DEFAULT_REPO_PREFIX).is_err());
        assert!(validate_repo_url("https://github.com///", DEFAULT_REPO_PREFIX).is_err());
    }

    #[test]
    fn rejected_repo_keeps_previous_selection() {
        let mut selector = InputSelector::default();
        selector.set_local_archive("src.zip", Bytes::from_static(b"PK"));
        assert!(selector.set_remote_repo("ftp://github.com/org/repo").is_err());
        assert_eq!(selector.kind(), Some(SourceKind::LocalArchive));
    }

    #[test]
    fn modes_replace_each_other() {
        let mut selector = InputSelector::default();
        selector.set_remote_repo("https://github.com/org/repo").unwrap();
        assert_eq!(selector.kind(), Some(SourceKind::RemoteRepo));
        selector.set_local_archive("src.zip", Bytes::from_static(b"PK"));
        assert_eq!(selector.kind(), Some(SourceKind::LocalArchive));
        selector.set_remote_repo("https://github.com/org/other").unwrap();
        assert_eq!(
            selector.source(),
            Some(&InputSource::RemoteRepo {
                url: "https://github.com/org/other".to_string()
            })
        );
    }
}
