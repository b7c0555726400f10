use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::CollectionStore;
use crate::error::{CollectorError, Result};

/// In-process store. Clones share the same data, so a test can keep a
/// handle after giving the store to a [`Collector`](crate::Collector).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shelves: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    saves: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed raw documents for `user_id`.
    pub fn with_user(self, user_id: impl Into<String>, collections: Vec<Value>) -> Result<Self> {
        self.lock()?.insert(user_id.into(), collections);
        Ok(self)
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// What is currently stored for `user_id`.
    pub fn stored(&self, user_id: &str) -> Option<Vec<Value>> {
        self.shelves.lock().ok()?.get(user_id).cloned()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<Value>>>> {
        self.shelves
            .lock()
            .map_err(|_| CollectorError::InvalidArgument("memory store lock poisoned".into()))
    }
}

impl CollectionStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn fetch_collections(&self, user_id: &str) -> Result<Vec<Value>> {
        Ok(self.lock()?.get(user_id).cloned().unwrap_or_default())
    }

    fn save_documents(&self, user_id: &str, documents: &[Value]) -> Result<()> {
        self.lock()?.insert(user_id.to_string(), documents.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
