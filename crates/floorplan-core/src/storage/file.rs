//! File-based storage implementation.

use super::{Storage, StorageError, StorageResult, encode};
use crate::document::FloorplanDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// File-based storage.
///
/// Locations are file paths. Relative paths resolve against the base
/// directory when one is set, otherwise against the working directory.
#[derive(Debug, Clone, Default)]
pub struct FileStorage {
    /// Base directory for relative locations.
    base_path: Option<PathBuf>,
}

impl FileStorage {
    /// Storage resolving locations as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage resolving relative locations inside `base_path`.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn in_dir(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self {
            base_path: Some(base_path),
        })
    }

    /// Get the file path for a location.
    pub fn document_path(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }
}

impl Storage for FileStorage {
    fn save(&self, location: &str, document: &FloorplanDocument) -> StorageResult<()> {
        let json = encode(document)?;
        let path = self.document_path(location);
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        log::info!("Saved {} elements to {}", document.len(), path.display());
        Ok(())
    }

    fn load(&self, location: &str) -> StorageResult<FloorplanDocument> {
        let path = self.document_path(location);
        if !path.exists() {
            return Err(StorageError::NotFound(location.to_string()));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let document = FloorplanDocument::from_json(&json)?;
        log::info!("Loaded {} elements from {}", document.len(), path.display());
        Ok(document)
    }

    fn exists(&self, location: &str) -> StorageResult<bool> {
        Ok(self.document_path(location).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Element;
    use kurbo::Point;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path().to_path_buf()).unwrap();

        let doc = FloorplanDocument::from_elements([Element::spawn_at(Point::new(100.0, 200.0))]);
        storage.save("layout.json", &doc).unwrap();
        assert!(dir.path().join("layout.json").exists());

        let loaded = storage.load("layout.json").unwrap();
        assert_eq!(loaded.to_value().unwrap(), doc.to_value().unwrap());
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path().to_path_buf()).unwrap();

        let result = storage.load("nonexistent.json");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_malformed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "{\"Elements\": 3}").unwrap();
        let storage = FileStorage::in_dir(dir.path().to_path_buf()).unwrap();

        let result = storage.load("bad.json");
        assert!(matches!(result, Err(StorageError::Document(_))));
    }

    #[test]
    fn test_file_storage_refuses_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path().to_path_buf()).unwrap();

        let result = storage.save("empty.json", &FloorplanDocument::new());
        assert!(matches!(result, Err(StorageError::NothingToSave)));
        assert!(!storage.exists("empty.json").unwrap());
    }

    #[test]
    fn test_absolute_location_ignores_base() {
        let dir = tempdir().unwrap();
        let other = tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path().to_path_buf()).unwrap();
        let target = other.path().join("plan.json");
        assert_eq!(storage.document_path(target.to_str().unwrap()), target);
    }

    #[test]
    fn test_creates_base_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::in_dir(nested.clone()).unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.base_path(), Some(nested.as_path()));
    }
}
