use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a local archive.
    LocalArchiveSelected { name: String, bytes: Bytes },
    /// User entered a remote repository reference.
    RemoteRepoEntered(String),
    /// User changed the target language; `None` selects summarize-only.
    TargetLanguageChanged(Option<crate::TargetLanguage>),
    /// User asked to submit the current input.
    SubmitClicked,
    /// User asked to resend the retained input.
    ReprocessClicked,
    /// Backend returned a result archive for the in-flight request.
    SubmissionSucceeded { filename: String, byte_len: u64 },
    /// The in-flight request failed.
    SubmissionFailed(crate::SessionError),
    /// The result archive arrived but could not be opened for preview.
    PreviewExtractionFailed { message: String },
}
