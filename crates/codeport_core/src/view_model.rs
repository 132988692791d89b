use crate::{FailureClass, ResultSummary, SessionMode, SourceKind, TargetLanguage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
    Error(FailureClass),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub mode: SessionMode,
    pub input_kind: Option<SourceKind>,
    pub input_label: Option<String>,
    pub target_language: Option<TargetLanguage>,
    pub status_message: Option<String>,
    pub status_tone: Option<StatusTone>,
    pub can_submit: bool,
    pub can_reprocess: bool,
    pub result: Option<ResultSummary>,
    pub dirty: bool,
}
