use std::collections::HashSet;
use std::fmt;
use std::io::{Cursor, Read};

use bytes::Bytes;
use codeport_logging::{cp_debug, cp_info, cp_warn};
use futures_util::future::join_all;
use zip::ZipArchive;

use crate::classify::{classify, ContentKind};
use crate::decode::{decode_text, DecodeError};

type SharedArchive = ZipArchive<Cursor<Bytes>>;

/// The container itself could not be read. Problems with a single member
/// never produce this; they surface on that member only.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("failed to open archive: {0}")]
    Open(String),
}

/// Failure to decode a single entry. Never escapes the entry it belongs to.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EntryDecodeError {
    #[error("{0}")]
    Read(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Lazy reference to one member of a result archive.
///
/// Cloning is cheap: the parsed central directory and the archive bytes are
/// shared, and nothing is decompressed until one of the read methods runs.
#[derive(Clone)]
pub struct EntryHandle {
    archive: SharedArchive,
    index: usize,
}

impl fmt::Debug for EntryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryHandle")
            .field("index", &self.index)
            .field("archive_entries", &self.archive.len())
            .finish()
    }
}

impl EntryHandle {
    /// Reads and checks the member's bytes. A damaged local header or a
    /// checksum mismatch is reported here, for this entry alone.
    pub fn read_bytes(&self) -> Result<Vec<u8>, EntryDecodeError> {
        let mut archive = self.archive.clone();
        let mut file = archive
            .by_index(self.index)
            .map_err(|err| EntryDecodeError::Read(err.to_string()))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|err| EntryDecodeError::Read(err.to_string()))?;
        Ok(buf)
    }

    pub async fn decode_text(&self) -> Result<String, EntryDecodeError> {
        tokio::task::yield_now().await;
        let raw = self.read_bytes()?;
        Ok(decode_text(&raw)?)
    }

    pub async fn decode_binary(&self) -> Result<Bytes, EntryDecodeError> {
        tokio::task::yield_now().await;
        self.read_bytes().map(Bytes::from)
    }
}

#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub path: String,
    pub kind: ContentKind,
    pub handle: EntryHandle,
    pub decoded_content: Option<String>,
    pub is_transient_resource: bool,
}

impl ArchiveEntry {
    /// Last path component, used when saving the entry on its own.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

pub(crate) fn content_error_placeholder(err: &EntryDecodeError) -> String {
    format!("Error loading content: {err}")
}

/// Opens result archives and publishes their entries in archive order.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Lists the non-directory entries of `archive`. Text entries are decoded
    /// before returning; every other kind is left for on-demand decoding.
    ///
    /// The listing comes from the central directory only, so a damaged
    /// member does not hide its neighbours.
    pub async fn extract(&self, archive: Bytes) -> Result<Vec<ArchiveEntry>, ExtractionError> {
        let archive_len = archive.len();
        let zip = ZipArchive::new(Cursor::new(archive))
            .map_err(|err| ExtractionError::Open(err.to_string()))?;

        let mut entries = Vec::with_capacity(zip.len());
        let mut seen = HashSet::new();
        for index in 0..zip.len() {
            let Some(path) = zip.name_for_index(index) else {
                cp_warn!("Archive entry #{} has no name, skipping", index);
                continue;
            };
            if path.ends_with('/') || path.ends_with('\\') {
                continue;
            }
            if !seen.insert(path.to_string()) {
                cp_warn!("Skipping duplicate archive entry {}", path);
                continue;
            }
            entries.push(ArchiveEntry {
                kind: classify(path),
                path: path.to_string(),
                handle: EntryHandle {
                    archive: zip.clone(),
                    index,
                },
                decoded_content: None,
                is_transient_resource: false,
            });
        }

        let decodes = entries
            .iter_mut()
            .filter(|entry| entry.kind == ContentKind::Text)
            .map(|entry| async move {
                let content = match entry.handle.decode_text().await {
                    Ok(text) => text,
                    Err(err) => {
                        cp_warn!("Error loading text file {}: {}", entry.path, err);
                        content_error_placeholder(&err)
                    }
                };
                cp_debug!("Decoded {} ({} chars)", entry.path, content.len());
                entry.decoded_content = Some(content);
            });
        let text_count = join_all(decodes).await.len();

        cp_info!(
            "Extracted {} entries ({} text) from {} byte archive",
            entries.len(),
            text_count,
            archive_len
        );
        Ok(entries)
    }
}
