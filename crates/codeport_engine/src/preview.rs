use std::path::{Path, PathBuf};

use codeport_logging::{cp_info, cp_warn};

use crate::archive::{content_error_placeholder, ArchiveEntry};
use crate::classify::{image_mime_type, ContentKind};
use crate::filename::sanitize_filename;
use crate::persist::AtomicFileWriter;
use crate::presenter::DownloadError;
use crate::resource::{ResourceSlot, TransientStore};

pub const PDF_PLACEHOLDER: &str = "This is a PDF file. Click below to download.";
pub const UNSUPPORTED_PLACEHOLDER: &str = "Cannot preview this file type directly.";
const FALLBACK_ENTRY_NAME: &str = "entry.bin";

/// What the preview surface shows. For a successfully decoded image the
/// entry's `decoded_content` holds the transient URI and
/// `is_transient_resource` is set.
#[derive(Debug, Clone, Default)]
pub struct PreviewSelection {
    pub entry: Option<ArchiveEntry>,
    pub open: bool,
}

#[derive(Debug)]
pub struct PreviewManager {
    store: TransientStore,
    selection: PreviewSelection,
    slot: ResourceSlot,
}

impl PreviewManager {
    pub fn new(store: TransientStore) -> Self {
        Self {
            store,
            selection: PreviewSelection::default(),
            slot: ResourceSlot::new(),
        }
    }

    pub fn selection(&self) -> &PreviewSelection {
        &self.selection
    }

    /// Opens the surface on the entry list without selecting anything.
    pub fn open(&mut self) {
        self.selection.open = true;
    }

    pub async fn select(&mut self, entry: &ArchiveEntry) -> &PreviewSelection {
        self.slot.release();

        let mut shown = entry.clone();
        shown.is_transient_resource = false;
        match entry.kind {
            ContentKind::Text => {
                if shown.decoded_content.is_none() {
                    let content = match entry.handle.decode_text().await {
                        Ok(text) => text,
                        Err(err) => {
                            cp_warn!("Error fetching content for {}: {}", entry.path, err);
                            content_error_placeholder(&err)
                        }
                    };
                    shown.decoded_content = Some(content);
                }
            }
            ContentKind::Pdf => {
                shown.decoded_content = Some(PDF_PLACEHOLDER.to_string());
            }
            ContentKind::Image => match entry.handle.decode_binary().await {
                Ok(bytes) => {
                    let handle = self
                        .slot
                        .acquire(&self.store, bytes, image_mime_type(&entry.path));
                    shown.decoded_content = Some(handle.uri().to_string());
                    shown.is_transient_resource = true;
                }
                Err(err) => {
                    cp_warn!("Error creating preview for image {}: {}", entry.path, err);
                    shown.decoded_content = Some(format!("Error loading image: {err}"));
                }
            },
            ContentKind::Other => {
                shown.decoded_content = Some(UNSUPPORTED_PLACEHOLDER.to_string());
            }
        }

        self.selection = PreviewSelection {
            entry: Some(shown),
            open: true,
        };
        &self.selection
    }

    pub fn close(&mut self) {
        self.slot.release();
        self.selection = PreviewSelection::default();
    }

    /// Writes one entry's raw bytes into `dir`. The bytes are only read here,
    /// which is how PDFs and other non-previewable entries are fetched.
    pub async fn download_entry(
        &self,
        entry: &ArchiveEntry,
        dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let bytes = entry.handle.decode_binary().await?;
        let handle = self.store.create(bytes, "application/octet-stream");
        let content = self
            .store
            .resolve(handle.uri())
            .ok_or(DownloadError::Revoked)?;
        let mut filename = sanitize_filename(entry.file_name());
        if filename.is_empty() {
            filename = FALLBACK_ENTRY_NAME.to_string();
        }
        let written = AtomicFileWriter::new(dir).write(&filename, &content.bytes);
        handle.release();

        let path = written?;
        cp_info!("Saved {} to {}", entry.path, path.display());
        Ok(path)
    }
}
