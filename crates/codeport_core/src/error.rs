use std::fmt;

use crate::ValidationError;

/// Message carried by a non-success backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendDetail {
    /// The body parsed as an object carrying a message field.
    Structured(String),
    /// The body was not structured; holds a leading excerpt of the raw text.
    Raw(String),
}

impl BackendDetail {
    pub fn message(&self) -> &str {
        match self {
            BackendDetail::Structured(message) | BackendDetail::Raw(message) => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    pub status: u16,
    pub reason: String,
    pub detail: BackendDetail,
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error (code: {} {}).", self.status, self.reason)?;
        match &self.detail {
            BackendDetail::Structured(message) => write!(f, " Details: {message}"),
            BackendDetail::Raw(excerpt) => write!(f, " Details: {excerpt}..."),
        }
    }
}

/// Session-level failure. `Display` renders the status line shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Connection error: {message}. Ensure the analysis server is running.")]
    Network { message: String },
    #[error("{0}")]
    Backend(BackendFailure),
    #[error("Error processing ZIP for preview.")]
    Extraction { message: String },
}

/// Classification tag attached to a failed status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Validation,
    Network,
    BackendStructured,
    BackendRaw,
    Extraction,
}

impl SessionError {
    pub fn class(&self) -> FailureClass {
        match self {
            SessionError::Validation(_) => FailureClass::Validation,
            SessionError::Network { .. } => FailureClass::Network,
            SessionError::Backend(BackendFailure {
                detail: BackendDetail::Structured(_),
                ..
            }) => FailureClass::BackendStructured,
            SessionError::Backend(_) => FailureClass::BackendRaw,
            SessionError::Extraction { .. } => FailureClass::Extraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_backend_message_is_verbatim() {
        let err = SessionError::Backend(BackendFailure {
            status: 400,
            reason: "Bad Request".into(),
            detail: BackendDetail::Structured("parse error".into()),
        });
        assert_eq!(
            err.to_string(),
            "Error (code: 400 Bad Request). Details: parse error"
        );
        assert_eq!(err.class(), FailureClass::BackendStructured);
    }

    #[test]
    fn raw_backend_excerpt_is_marked_truncated() {
        let err = SessionError::Backend(BackendFailure {
            status: 502,
            reason: "Bad Gateway".into(),
            detail: BackendDetail::Raw("<html>upstream".into()),
        });
        assert_eq!(
            err.to_string(),
            "Error (code: 502 Bad Gateway). Details: <html>upstream..."
        );
        assert_eq!(err.class(), FailureClass::BackendRaw);
    }
}
