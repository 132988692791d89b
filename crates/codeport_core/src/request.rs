use crate::{InputSource, SourceKind, TargetLanguage};

/// Backend endpoint family a request is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SubmitLocalArchive,
    ReprocessLocalArchive,
    SubmitRemoteRepo,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::SubmitLocalArchive => "/upload",
            Endpoint::ReprocessLocalArchive => "/reprocess",
            Endpoint::SubmitRemoteRepo => "/analyze_repo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub source: InputSource,
    pub target_language: Option<TargetLanguage>,
    pub is_reprocess: bool,
}

impl SubmissionRequest {
    pub fn kind(&self) -> SourceKind {
        self.source.kind()
    }

    /// Remote repositories use one endpoint for both first runs and reprocessing.
    pub fn endpoint(&self) -> Endpoint {
        match (self.kind(), self.is_reprocess) {
            (SourceKind::LocalArchive, false) => Endpoint::SubmitLocalArchive,
            (SourceKind::LocalArchive, true) => Endpoint::ReprocessLocalArchive,
            (SourceKind::RemoteRepo, _) => Endpoint::SubmitRemoteRepo,
        }
    }

    pub(crate) fn in_flight_message(&self) -> &'static str {
        match (self.kind(), self.is_reprocess) {
            (SourceKind::LocalArchive, false) => "Uploading ZIP...",
            (SourceKind::LocalArchive, true) => "Reprocessing ZIP...",
            (SourceKind::RemoteRepo, false) => "Cloning and analyzing repository...",
            (SourceKind::RemoteRepo, true) => "Reprocessing repository...",
        }
    }

    pub(crate) fn success_message(&self) -> &'static str {
        match (self.kind(), self.is_reprocess) {
            (SourceKind::LocalArchive, false) => {
                "Processing complete. Click to download the ZIP file."
            }
            (SourceKind::LocalArchive, true) => {
                "Processing complete. Click to download the reprocessed ZIP file."
            }
            (SourceKind::RemoteRepo, false) => {
                "Repository analysis complete. Click to download the ZIP file."
            }
            (SourceKind::RemoteRepo, true) => {
                "Repository analysis reprocessed. Click to download the ZIP file."
            }
        }
    }
}
