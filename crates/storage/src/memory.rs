//! In-memory storage, used by tests and dry runs.

use std::sync::{Arc, Mutex};

use habitkit_core::TrackerDocument;

use super::{Result, Storage, StorageError};

#[derive(Debug, Default)]
struct Inner {
    document: Option<TrackerDocument>,
    fail_saves: bool,
    saves: usize,
}

/// Storage that keeps the document in memory.
///
/// Clones share the same state, so a test can keep a handle to inspect what
/// the tracker saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `document`.
    pub fn with_document(document: TrackerDocument) -> Self {
        let storage = Self::new();
        storage.lock().document = Some(document);
        storage
    }

    /// Make every subsequent save fail until switched off again.
    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// Last saved document.
    pub fn document(&self) -> Option<TrackerDocument> {
        self.lock().document.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-save; the data is
        // still a whole document.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn load(&self) -> Result<Option<TrackerDocument>> {
        Ok(self.lock().document.clone())
    }

    async fn save(&mut self, document: &TrackerDocument) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_saves {
            return Err(StorageError::Other("memory store is read-only".to_string()));
        }
        inner.document = Some(document.clone());
        inner.saves += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
