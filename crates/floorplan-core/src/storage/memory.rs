//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult, encode};
use crate::document::FloorplanDocument;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Documents are kept as serialized JSON, so loading exercises the same
/// parser as files do.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under `location` without validating it.
    pub fn insert_raw(&self, location: &str, text: impl Into<String>) -> StorageResult<()> {
        let mut docs = self
            .documents
            .write()
            .map_err(|e| StorageError::Io(format!("Lock error: {}", e)))?;
        docs.insert(location.to_string(), text.into());
        Ok(())
    }

    /// The stored text for `location`.
    pub fn raw(&self, location: &str) -> StorageResult<Option<String>> {
        let docs = self
            .documents
            .read()
            .map_err(|e| StorageError::Io(format!("Lock error: {}", e)))?;
        Ok(docs.get(location).cloned())
    }
}

impl Storage for MemoryStorage {
    fn save(&self, location: &str, document: &FloorplanDocument) -> StorageResult<()> {
        let json = encode(document)?;
        self.insert_raw(location, json)
    }

    fn load(&self, location: &str) -> StorageResult<FloorplanDocument> {
        let json = self
            .raw(location)?
            .ok_or_else(|| StorageError::NotFound(location.to_string()))?;
        Ok(FloorplanDocument::from_json(&json)?)
    }

    fn exists(&self, location: &str) -> StorageResult<bool> {
        Ok(self.raw(location)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Element;
    use kurbo::Point;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let doc = FloorplanDocument::from_elements([Element::cubicle_at(Point::ZERO)]);

        storage.save("test", &doc).unwrap();
        let loaded = storage.load("test").unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.to_value().unwrap(), doc.to_value().unwrap());
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = storage.load("nonexistent");

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists() {
        let storage = MemoryStorage::new();
        let doc = FloorplanDocument::from_elements([Element::spawn_at(Point::ZERO)]);

        assert!(!storage.exists("test").unwrap());
        storage.save("test", &doc).unwrap();
        assert!(storage.exists("test").unwrap());
    }

    #[test]
    fn test_malformed_text() {
        let storage = MemoryStorage::new();
        storage.insert_raw("broken", "[{").unwrap();
        assert!(matches!(storage.load("broken"), Err(StorageError::Document(_))));
    }
}
