use std::path::{Path, PathBuf};

use bytes::Bytes;
use codeport_core::SourceKind;
use codeport_logging::cp_info;

use crate::archive::EntryDecodeError;
use crate::backend::BackendResponse;
use crate::filename::filename_for;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::resource::{ResourceSlot, TransientStore};

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("no result archive to download")]
    NoResult,
    #[error("no archive entry at position {0}")]
    NoSuchEntry(usize),
    #[error("transient resource revoked before use")]
    Revoked,
    #[error(transparent)]
    Entry(#[from] EntryDecodeError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Archive returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultArchive {
    pub bytes: Bytes,
    pub filename: String,
    pub source_kind: SourceKind,
}

impl ResultArchive {
    pub fn from_response(response: BackendResponse, source_kind: SourceKind) -> Self {
        let filename = ResultPresenter::filename_for(&response, source_kind);
        Self {
            bytes: response.bytes,
            filename,
            source_kind,
        }
    }
}

/// Owns the current result archive and its download slot.
#[derive(Debug)]
pub struct ResultPresenter {
    store: TransientStore,
    current: Option<ResultArchive>,
    slot: ResourceSlot,
}

impl ResultPresenter {
    pub fn new(store: TransientStore) -> Self {
        Self {
            store,
            current: None,
            slot: ResourceSlot::new(),
        }
    }

    pub fn filename_for(response: &BackendResponse, source_kind: SourceKind) -> String {
        filename_for(response.content_disposition.as_deref(), source_kind)
    }

    /// Replaces the current result, releasing the previous download handle.
    pub fn present(&mut self, archive: ResultArchive) {
        self.slot.release();
        self.current = Some(archive);
    }

    pub fn clear(&mut self) {
        self.slot.release();
        self.current = None;
    }

    pub fn current(&self) -> Option<&ResultArchive> {
        self.current.as_ref()
    }

    pub fn filename(&self) -> Option<&str> {
        self.current.as_ref().map(|archive| archive.filename.as_str())
    }

    /// Saves the current result archive into `dir` under its filename.
    pub fn download(&mut self, dir: &Path) -> Result<PathBuf, DownloadError> {
        let archive = self.current.as_ref().ok_or(DownloadError::NoResult)?;
        let handle = self
            .slot
            .acquire(&self.store, archive.bytes.clone(), "application/zip");
        let content = self
            .store
            .resolve(handle.uri())
            .ok_or(DownloadError::Revoked)?;
        let written = AtomicFileWriter::new(dir).write(&archive.filename, &content.bytes);
        self.slot.release();

        let path = written?;
        cp_info!("Saved result archive to {}", path.display());
        Ok(path)
    }
}
