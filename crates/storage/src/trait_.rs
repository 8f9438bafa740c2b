//! Storage trait abstraction.

use async_trait::async_trait;
use habitkit_core::TrackerDocument;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for the tracker document.
///
/// The whole document is read and written at once; there are no partial
/// updates.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load the document. `Ok(None)` means the store does not exist yet.
    async fn load(&self) -> Result<Option<TrackerDocument>>;

    /// Overwrite the stored document.
    async fn save(&mut self, document: &TrackerDocument) -> Result<()>;

    /// Human-readable location of the store, for diagnostics.
    fn location(&self) -> String;
}
