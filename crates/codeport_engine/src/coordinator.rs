use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use codeport_core::{
    update, Effect, Msg, SessionError, SessionMode, SessionState, SessionView, SubmissionRequest,
    TargetLanguage,
};
use codeport_logging::{cp_debug, cp_info, cp_warn};

use crate::archive::{ArchiveEntry, ArchiveExtractor};
use crate::backend::AnalysisBackend;
use crate::presenter::{DownloadError, ResultArchive, ResultPresenter};
use crate::preview::{PreviewManager, PreviewSelection};
use crate::resource::TransientStore;

/// Drives one session: feeds user commands through the pure `update`
/// function and executes the effects it returns.
///
/// Every command takes `&mut self`, so a front end can never interleave two
/// submissions; the state machine additionally ignores commands while a
/// request is in flight.
pub struct SubmissionCoordinator {
    state: SessionState,
    backend: Box<dyn AnalysisBackend>,
    extractor: ArchiveExtractor,
    entries: Vec<ArchiveEntry>,
    preview: PreviewManager,
    presenter: ResultPresenter,
    store: TransientStore,
}

impl SubmissionCoordinator {
    pub fn new(backend: Box<dyn AnalysisBackend>, state: SessionState) -> Self {
        let store = TransientStore::new();
        Self {
            state,
            backend,
            extractor: ArchiveExtractor::new(),
            entries: Vec::new(),
            preview: PreviewManager::new(store.clone()),
            presenter: ResultPresenter::new(store.clone()),
            store,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn view(&self) -> SessionView {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn preview(&self) -> &PreviewSelection {
        self.preview.selection()
    }

    pub fn result(&self) -> Option<&ResultArchive> {
        self.presenter.current()
    }

    /// Transient handles currently alive across all slots.
    pub fn live_resources(&self) -> usize {
        self.store.live_count()
    }

    pub fn transient_store(&self) -> &TransientStore {
        &self.store
    }

    pub async fn select_local_archive(&mut self, name: impl Into<String>, bytes: Bytes) {
        self.apply(Msg::LocalArchiveSelected {
            name: name.into(),
            bytes,
        })
        .await;
    }

    pub async fn set_remote_repo(&mut self, url: &str) -> Result<(), SessionError> {
        self.apply(Msg::RemoteRepoEntered(url.to_string())).await;
        match self.state.last_error() {
            Some(err @ SessionError::Validation(_)) => Err(err.clone()),
            _ => Ok(()),
        }
    }

    pub async fn set_target_language(&mut self, language: Option<TargetLanguage>) {
        self.apply(Msg::TargetLanguageChanged(language)).await;
    }

    /// Submits the active input and waits for the backend.
    pub async fn submit(&mut self, language: Option<TargetLanguage>) -> Result<(), SessionError> {
        self.apply(Msg::TargetLanguageChanged(language)).await;
        self.apply(Msg::SubmitClicked).await;
        self.outcome()
    }

    /// Resends the retained input and waits for the backend.
    pub async fn reprocess(
        &mut self,
        language: Option<TargetLanguage>,
    ) -> Result<(), SessionError> {
        self.apply(Msg::TargetLanguageChanged(language)).await;
        self.apply(Msg::ReprocessClicked).await;
        self.outcome()
    }

    /// Shows the entry at `index`; `None` when there is no such entry.
    pub async fn select_entry(&mut self, index: usize) -> Option<&PreviewSelection> {
        let entry = self.entries.get(index)?;
        Some(self.preview.select(entry).await)
    }

    pub fn open_preview(&mut self) {
        self.preview.open();
    }

    pub fn close_preview(&mut self) {
        self.preview.close();
    }

    pub fn download(&mut self, dir: &Path) -> Result<PathBuf, DownloadError> {
        self.presenter.download(dir)
    }

    pub async fn download_entry(&self, index: usize, dir: &Path) -> Result<PathBuf, DownloadError> {
        let entry = self
            .entries
            .get(index)
            .ok_or(DownloadError::NoSuchEntry(index))?;
        self.preview.download_entry(entry, dir).await
    }

    /// Releases every transient handle and drops the current result.
    pub fn teardown(&mut self) {
        self.discard_result();
        cp_debug!("Session torn down, {} live resources", self.store.live_count());
    }

    fn outcome(&self) -> Result<(), SessionError> {
        match self.state.last_error() {
            Some(err) if self.state.mode() == SessionMode::Error => Err(err.clone()),
            _ => Ok(()),
        }
    }

    async fn apply(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (next, effects) = update(state, msg);
            self.state = next;
            for effect in effects {
                queue.extend(self.run_effect(effect).await);
            }
        }
    }

    async fn run_effect(&mut self, effect: Effect) -> Vec<Msg> {
        match effect {
            Effect::DiscardResult => {
                self.discard_result();
                Vec::new()
            }
            Effect::Dispatch(request) => self.dispatch(request).await,
        }
    }

    async fn dispatch(&mut self, request: SubmissionRequest) -> Vec<Msg> {
        let response = match self.backend.dispatch(&request).await {
            Ok(response) => response,
            Err(err) => {
                cp_warn!("Submission of {:?} failed: {}", request.kind(), err);
                return vec![Msg::SubmissionFailed(err.into())];
            }
        };

        let archive = ResultArchive::from_response(response, request.kind());
        let mut msgs = vec![Msg::SubmissionSucceeded {
            filename: archive.filename.clone(),
            byte_len: archive.bytes.len() as u64,
        }];
        let bytes = archive.bytes.clone();
        self.presenter.present(archive);
        self.preview.close();
        self.entries.clear();

        match self.extractor.extract(bytes).await {
            Ok(entries) => self.entries = entries,
            Err(err) => {
                cp_warn!("Error extracting result archive for preview: {}", err);
                msgs.push(Msg::PreviewExtractionFailed {
                    message: err.to_string(),
                });
            }
        }
        cp_info!(
            "Result {} ready with {} entries",
            self.presenter.filename().unwrap_or_default(),
            self.entries.len()
        );
        msgs
    }

    fn discard_result(&mut self) {
        self.preview.close();
        self.presenter.clear();
        self.entries.clear();
    }
}
