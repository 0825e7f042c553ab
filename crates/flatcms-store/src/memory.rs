use std::collections::BTreeMap;
use std::sync::RwLock;

use flatcms_types::DocumentName;

use crate::error::{check_component, StoreError, StoreResult};
use crate::traits::DocumentStore;

/// In-memory, `BTreeMap`-based document store.
///
/// Intended for tests and embedding. Documents are held behind a `RwLock`
/// and cloned on read; listing is in name order.
pub struct InMemoryDocumentStore {
    documents: RwLock<BTreeMap<String, String>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.documents.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn list(&self) -> StoreResult<Vec<String>> {
        let map = self.documents.read().expect("lock poisoned");
        Ok(map.keys().cloned().collect())
    }

    fn exists(&self, name: &str) -> StoreResult<bool> {
        check_component(name)?;
        let map = self.documents.read().expect("lock poisoned");
        Ok(map.contains_key(name))
    }

    fn read(&self, name: &str) -> StoreResult<String> {
        check_component(name)?;
        let map = self.documents.read().expect("lock poisoned");
        map.get(name)
            .cloned()
            .ok_or_else(|| StoreError::not_found(name))
    }

    fn write(&self, name: &DocumentName, content: &str) -> StoreResult<()> {
        let mut map = self.documents.write().expect("lock poisoned");
        map.insert(name.as_str().to_string(), content.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        check_component(name)?;
        let mut map = self.documents.write().expect("lock poisoned");
        map.remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(name))
    }
}
