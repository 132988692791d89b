//! Codeport engine: archive handling, backend IO and effect execution.
mod archive;
mod backend;
mod classify;
mod coordinator;
mod decode;
mod filename;
mod persist;
mod presenter;
mod preview;
mod resource;

pub use archive::{ArchiveEntry, ArchiveExtractor, EntryDecodeError, EntryHandle, ExtractionError};
pub use backend::{
    classify_failure, AnalysisBackend, BackendResponse, BackendSettings, DispatchError,
    ReqwestBackend, ERROR_BODY_LIMIT, RAW_EXCERPT_CHARS, REPROCESS_UPLOAD_NAME,
};
pub use classify::{classify, image_mime_type, ContentKind};
pub use coordinator::SubmissionCoordinator;
pub use decode::{decode_text, DecodeError};
pub use filename::{
    default_filename, filename_for, filename_from_disposition, sanitize_filename,
    DEFAULT_ARCHIVE_RESULT_NAME, DEFAULT_REPO_RESULT_NAME,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use presenter::{DownloadError, ResultArchive, ResultPresenter};
pub use preview::{PreviewManager, PreviewSelection, PDF_PLACEHOLDER, UNSUPPORTED_PLACEHOLDER};
pub use resource::{ResourceSlot, TransientContent, TransientHandle, TransientStore};
