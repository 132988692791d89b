use crate::{
    InputSelector, InputSource, SessionError, SessionView, SourceKind, StatusTone,
    SubmissionRequest, TargetLanguage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// Input kept from the last successful first-time submission so it can be
/// resent verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainedSource {
    pub source: InputSource,
    pub last_target_language: Option<TargetLanguage>,
}

impl RetainedSource {
    pub fn kind(&self) -> SourceKind {
        self.source.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Success(String),
    Failed(SessionError),
}

impl Status {
    pub fn message(&self) -> String {
        match self {
            Status::Info(message) | Status::Success(message) => message.clone(),
            Status::Failed(err) => err.to_string(),
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            Status::Info(_) => StatusTone::Info,
            Status::Success(_) => StatusTone::Success,
            Status::Failed(err) => StatusTone::Error(err.class()),
        }
    }
}

/// What the session currently offers for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub kind: SourceKind,
    pub filename: String,
    pub byte_len: u64,
    pub is_reprocess: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    input: InputSelector,
    target_language: Option<TargetLanguage>,
    mode: SessionMode,
    retained: Option<RetainedSource>,
    last_success_kind: Option<SourceKind>,
    result: Option<ResultSummary>,
    in_flight: Option<SubmissionRequest>,
    status: Option<Status>,
    dirty: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose remote references must start with `repo_prefix`.
    pub fn with_repo_prefix(repo_prefix: impl Into<String>) -> Self {
        Self {
            input: InputSelector::new(repo_prefix),
            ..Self::default()
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn input(&self) -> &InputSelector {
        &self.input
    }

    pub fn target_language(&self) -> Option<TargetLanguage> {
        self.target_language
    }

    pub fn retained_source(&self) -> Option<&RetainedSource> {
        self.retained.as_ref()
    }

    pub fn result(&self) -> Option<&ResultSummary> {
        self.result.as_ref()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// The failure behind the current status, if the status is a failure.
    pub fn last_error(&self) -> Option<&SessionError> {
        match &self.status {
            Some(Status::Failed(err)) => Some(err),
            _ => None,
        }
    }

    pub fn in_flight(&self) -> Option<&SubmissionRequest> {
        self.in_flight.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True when a retained source exists, it is of the same kind as the most
    /// recent successful result, and no input of another kind is selected.
    pub fn can_reprocess(&self) -> bool {
        match (&self.retained, self.last_success_kind) {
            (Some(retained), Some(kind)) if retained.kind() == kind => {
                self.input.kind().map_or(true, |current| current == kind)
            }
            _ => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.is_busy() && self.input.source().is_some()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            mode: self.mode,
            input_kind: self.input.kind(),
            input_label: self.input.source().map(|s| s.label().to_string()),
            target_language: self.target_language,
            status_message: self.status.as_ref().map(Status::message),
            status_tone: self.status.as_ref().map(Status::tone),
            can_submit: self.can_submit(),
            can_reprocess: !self.is_busy() && self.can_reprocess(),
            result: self.result.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn input_mut(&mut self) -> &mut InputSelector {
        self.dirty = true;
        &mut self.input
    }

    pub(crate) fn set_target_language(&mut self, language: Option<TargetLanguage>) {
        if self.target_language != language {
            self.target_language = language;
            self.dirty = true;
        }
    }

    /// Drops the retained source when it is not of `kind`.
    pub(crate) fn retain_only(&mut self, kind: SourceKind) {
        if self.retained.as_ref().is_some_and(|r| r.kind() != kind) {
            self.retained = None;
            self.dirty = true;
        }
    }

    /// Clears status and result after an input change. Returns whether a
    /// result was showing.
    pub(crate) fn reset_outcome(&mut self) -> bool {
        self.mode = SessionMode::Idle;
        self.status = None;
        self.dirty = true;
        self.result.take().is_some()
    }

    /// Moves to `Submitting`. Returns whether a previous result was dropped.
    pub(crate) fn begin(&mut self, request: &SubmissionRequest) -> bool {
        self.mode = SessionMode::Submitting;
        self.status = Some(Status::Info(request.in_flight_message().to_string()));
        self.in_flight = Some(request.clone());
        self.dirty = true;
        self.result.take().is_some()
    }

    pub(crate) fn take_in_flight(&mut self) -> Option<SubmissionRequest> {
        self.in_flight.take()
    }

    pub(crate) fn succeed(&mut self, request: SubmissionRequest, filename: String, byte_len: u64) {
        let kind = request.kind();
        self.status = Some(Status::Success(request.success_message().to_string()));
        self.result = Some(ResultSummary {
            kind,
            filename,
            byte_len,
            is_reprocess: request.is_reprocess,
        });
        if !request.is_reprocess {
            self.retained = Some(RetainedSource {
                source: request.source,
                last_target_language: request.target_language,
            });
        }
        self.last_success_kind = Some(kind);
        self.mode = SessionMode::Success;
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, err: SessionError) {
        self.mode = SessionMode::Error;
        self.status = Some(Status::Failed(err));
        self.dirty = true;
    }

    /// Preview failures downgrade the status line only; the result stays downloadable.
    pub(crate) fn flag_preview_failure(&mut self, message: String) {
        self.status = Some(Status::Failed(SessionError::Extraction { message }));
        self.dirty = true;
    }
}
