use std::time::Duration;

use bytes::Bytes;
use codeport_core::{
    BackendDetail, BackendFailure, Endpoint, InputSource, SessionError, SubmissionRequest,
};
use codeport_logging::{cp_info, cp_warn};
use futures_util::StreamExt;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

/// File name sent with a reprocessed archive.
pub const REPROCESS_UPLOAD_NAME: &str = "reprocess.zip";
/// Characters of an unstructured error body kept for the status line.
pub const RAW_EXCERPT_CHARS: usize = 200;
/// Bytes of a non-success body read for classification.
pub const ERROR_BODY_LIMIT: u64 = 64 * 1024;

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            // Analysis runs model calls per file; large archives take minutes.
            request_timeout: Duration::from_secs(600),
            max_bytes: 256 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub bytes: Bytes,
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("{0}")]
    Transport(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("{0}")]
    Status(BackendFailure),
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl From<DispatchError> for SessionError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Status(failure) => SessionError::Backend(failure),
            // No complete response was obtained in any of these cases.
            other => SessionError::Network {
                message: other.to_string(),
            },
        }
    }
}

/// The external analysis service.
#[async_trait::async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn dispatch(&self, request: &SubmissionRequest)
        -> Result<BackendResponse, DispatchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| DispatchError::Transport(err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}{}",
            self.settings.base_url.trim_end_matches('/'),
            endpoint.path()
        )
    }
}

#[async_trait::async_trait]
impl AnalysisBackend for ReqwestBackend {
    async fn dispatch(
        &self,
        request: &SubmissionRequest,
    ) -> Result<BackendResponse, DispatchError> {
        let url = self.endpoint_url(request.endpoint());
        cp_info!(
            "Dispatching {:?} to {} language={} reprocess={}",
            request.kind(),
            url,
            request
                .target_language
                .map_or("none", |language| language.as_form_value()),
            request.is_reprocess
        );

        let response = self
            .client
            .post(&url)
            .multipart(build_form(request)?)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let limit = self.settings.max_bytes.min(ERROR_BODY_LIMIT);
            let body = match read_error_body(response, limit).await {
                Ok(body) => body,
                Err(err) => {
                    cp_warn!("Failed to read {} error body from {}: {}", status, url, err);
                    String::new()
                }
            };
            let failure = classify_failure(
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                &body,
            );
            cp_warn!(
                "Backend error {} from {}: {}",
                status,
                url,
                failure.detail.message()
            );
            return Err(DispatchError::Status(failure));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(DispatchError::TooLarge {
                    max_bytes: self.settings.max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let header = |name| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.to_string())
        };
        let content_disposition = header(CONTENT_DISPOSITION);
        let content_type = header(CONTENT_TYPE);

        let bytes = read_body(response, self.settings.max_bytes).await?;
        cp_info!("Received {} byte result from {}", bytes.len(), url);
        Ok(BackendResponse {
            bytes: Bytes::from(bytes),
            content_disposition,
            content_type,
        })
    }
}

/// Streams a success body, failing once it grows past `max_bytes`.
async fn read_body(response: reqwest::Response, max_bytes: u64) -> Result<Vec<u8>, DispatchError> {
    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(DispatchError::TooLarge {
                max_bytes,
                actual: Some(next_len),
            });
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Streams an error body, keeping at most `limit` bytes. Only the start of
/// the body is ever shown, so the rest is not read.
async fn read_error_body(response: reqwest::Response, limit: u64) -> Result<String, DispatchError> {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let room = limit - bytes.len();
        if chunk.len() >= room {
            bytes.extend_from_slice(&chunk[..room]);
            break;
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn build_form(request: &SubmissionRequest) -> Result<Form, DispatchError> {
    let mut form = match &request.source {
        InputSource::LocalArchive { bytes, name } => {
            let file_name = if request.is_reprocess {
                REPROCESS_UPLOAD_NAME.to_string()
            } else {
                name.clone()
            };
            let part = Part::bytes(bytes.to_vec())
                .file_name(file_name)
                .mime_str("application/zip")
                .map_err(|err| DispatchError::Transport(err.to_string()))?;
            Form::new().part("archive_file", part)
        }
        InputSource::RemoteRepo { url } => Form::new().text("repo_url", url.clone()),
    };
    if let Some(language) = request.target_language {
        form = form.text("target_language", language.as_form_value());
    }
    if request.is_reprocess {
        form = form.text("is_reprocess", "true");
    }
    Ok(form)
}

/// Splits a non-success body into a structured message or a raw excerpt.
///
/// Structured means a JSON object carrying `detail`, `error` or `message`;
/// non-string values are rendered as JSON.
pub fn classify_failure(status: u16, reason: &str, body: &str) -> BackendFailure {
    let structured = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => ["detail", "error", "message"]
            .iter()
            .find_map(|key| map.get(*key).filter(|value| !value.is_null()))
            .map(|value| match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            }),
        _ => None,
    };
    let detail = match structured {
        Some(message) => BackendDetail::Structured(message),
        None => BackendDetail::Raw(body.chars().take(RAW_EXCERPT_CHARS).collect()),
    };
    BackendFailure {
        status,
        reason: reason.to_string(),
        detail,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> DispatchError {
    if err.is_timeout() {
        return DispatchError::Timeout(err.to_string());
    }
    DispatchError::Transport(err.to_string())
}
