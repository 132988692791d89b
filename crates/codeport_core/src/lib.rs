//! Codeport core: pure session state machine and view-model helpers.
mod effect;
mod error;
mod input;
mod language;
mod msg;
mod request;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{BackendDetail, BackendFailure, FailureClass, SessionError};
pub use input::{
    validate_repo_url, InputSelector, InputSource, SourceKind, ValidationError,
    DEFAULT_REPO_PREFIX,
};
pub use language::{TargetLanguage, UnknownLanguage};
pub use msg::Msg;
pub use request::{Endpoint, SubmissionRequest};
pub use state::{ResultSummary, RetainedSource, SessionMode, SessionState, Status};
pub use update::update;
pub use view_model::{SessionView, StatusTone};
