//! In-process document store for hosts and tests.

use crate::store::{DocumentStore, StoreError, StoreResult};
use std::collections::BTreeMap;

/// Map-backed store; documents live only for the process lifetime.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces one document.
    pub fn insert(&mut self, doc_id: impl Into<String>, text: impl Into<String>) {
        self.docs.insert(doc_id.into(), text.into());
    }

    /// Removes one document, returning whether it existed.
    pub fn remove(&mut self, doc_id: &str) -> bool {
        self.docs.remove(doc_id).is_some()
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.docs.contains_key(doc_id)
    }
}

impl DocumentStore for MemoryStore {
    fn read_all(&self, doc_id: &str) -> StoreResult<String> {
        self.docs
            .get(doc_id)
            .cloned()
            .ok_or_else(|| StoreError::DocumentNotFound(doc_id.to_string()))
    }

    fn write_all(&mut self, doc_id: &str, text: &str) -> StoreResult<()> {
        self.docs.insert(doc_id.to_string(), text.to_string());
        Ok(())
    }
}
