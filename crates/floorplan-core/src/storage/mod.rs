//! Storage abstraction for loading and saving floorplan documents.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::document::{DocumentError, FloorplanDocument};
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Failed to read document: {0}")]
    Document(#[from] DocumentError),
    #[error("Nothing to save")]
    NothingToSave,
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document storage backends.
///
/// A location is a backend-specific key: a file path for [`FileStorage`],
/// an arbitrary name for [`MemoryStorage`].
pub trait Storage: Send + Sync {
    /// Save a document. Empty documents are refused.
    fn save(&self, location: &str, document: &FloorplanDocument) -> StorageResult<()>;

    /// Load a document.
    fn load(&self, location: &str) -> StorageResult<FloorplanDocument>;

    /// Check if a document exists.
    fn exists(&self, location: &str) -> StorageResult<bool>;
}

/// Serialize a document for saving, refusing empty ones.
fn encode(document: &FloorplanDocument) -> StorageResult<String> {
    if document.is_empty() {
        return Err(StorageError::NothingToSave);
    }
    Ok(document.to_json()?)
}
