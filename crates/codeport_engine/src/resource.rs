//! Transient, revocable handles to in-memory binary content.
//!
//! A [`TransientHandle`] is the only owner of its resource: it cannot be
//! cloned, and the resource is revoked exactly once, when the handle is
//! released or dropped. A [`ResourceSlot`] holds at most one live handle and
//! releases the previous occupant before a new one is created.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use codeport_logging::cp_debug;
use parking_lot::Mutex;

const URI_PREFIX: &str = "blob:codeport/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientContent {
    pub bytes: Bytes,
    pub mime_type: String,
}

#[derive(Debug, Default)]
struct StoreInner {
    next_id: u64,
    live: HashMap<u64, TransientContent>,
}

/// Registry backing every transient handle of one session.
#[derive(Debug, Clone, Default)]
pub struct TransientStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl TransientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, bytes: Bytes, mime_type: &str) -> TransientHandle {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        cp_debug!("Created transient resource {} ({} bytes, {})", id, bytes.len(), mime_type);
        inner.live.insert(
            id,
            TransientContent {
                bytes,
                mime_type: mime_type.to_string(),
            },
        );
        TransientHandle {
            id,
            uri: format!("{URI_PREFIX}{id}"),
            store: self.clone(),
        }
    }

    /// Looks up live content by URI. Revoked or unknown URIs resolve to `None`.
    pub fn resolve(&self, uri: &str) -> Option<TransientContent> {
        let id = uri.strip_prefix(URI_PREFIX)?.parse::<u64>().ok()?;
        self.inner.lock().live.get(&id).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.inner.lock().live.len()
    }

    fn revoke(&self, id: u64) {
        if self.inner.lock().live.remove(&id).is_some() {
            cp_debug!("Revoked transient resource {}", id);
        }
    }
}

#[derive(Debug)]
pub struct TransientHandle {
    id: u64,
    uri: String,
    store: TransientStore,
}

impl TransientHandle {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Revokes the resource now instead of at end of scope.
    pub fn release(self) {}
}

impl Drop for TransientHandle {
    fn drop(&mut self) {
        self.store.revoke(self.id);
    }
}

/// Holds at most one live handle.
#[derive(Debug, Default)]
pub struct ResourceSlot {
    occupant: Option<TransientHandle>,
}

impl ResourceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases the current occupant, then creates and stores a new handle.
    pub fn acquire(
        &mut self,
        store: &TransientStore,
        bytes: Bytes,
        mime_type: &str,
    ) -> &TransientHandle {
        self.release();
        self.occupant.insert(store.create(bytes, mime_type))
    }

    /// Returns whether a handle was released.
    pub fn release(&mut self) -> bool {
        self.occupant.take().is_some()
    }

    pub fn current(&self) -> Option<&TransientHandle> {
        self.occupant.as_ref()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}
