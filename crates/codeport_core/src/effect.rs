use crate::SubmissionRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Release the current result archive, its download handle, the preview
    /// handle and the entry list.
    DiscardResult,
    /// Send the request to the backend and report back with
    /// `Msg::SubmissionSucceeded` or `Msg::SubmissionFailed`.
    Dispatch(SubmissionRequest),
}
