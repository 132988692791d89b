#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{Cursor, Write};
use std::sync::Arc;

use bytes::Bytes;
use codeport_core::SubmissionRequest;
use codeport_engine::{AnalysisBackend, BackendResponse, DispatchError};
use parking_lot::Mutex;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builds an in-memory ZIP. Names ending in `/` become directories.
pub fn zip_fixture(files: &[(&str, &[u8])]) -> Bytes {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in files {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    Bytes::from(writer.finish().unwrap().into_inner())
}

pub fn zip_response(bytes: Bytes, filename: Option<&str>) -> BackendResponse {
    BackendResponse {
        bytes,
        content_disposition: filename.map(|name| format!("attachment; filename=\"{name}\"")),
        content_type: Some("application/zip".to_string()),
    }
}

/// Backend double that records every request and replays queued replies.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    requests: Arc<Mutex<Vec<SubmissionRequest>>>,
    replies: Arc<Mutex<VecDeque<Result<BackendResponse, DispatchError>>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, reply: Result<BackendResponse, DispatchError>) -> &Self {
        self.replies.lock().push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<SubmissionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait::async_trait]
impl AnalysisBackend for RecordingBackend {
    async fn dispatch(
        &self,
        request: &SubmissionRequest,
    ) -> Result<BackendResponse, DispatchError> {
        self.requests.lock().push(request.clone());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(DispatchError::Transport("no reply queued".to_string())))
    }
}
