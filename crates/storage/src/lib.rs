//! Blob storage providers for portfolio assets.
//!
//! The store is an external collaborator with no transactional guarantee
//! against the relational database; the saga orchestrator in the API layer
//! owns the coordination. Providers only upload and delete by opaque key.

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use folio_core::asset_policy::AssetKind;

pub use memory::MemoryStore;
pub use s3::{S3Config, S3Store};

/// A successfully stored blob: the opaque key deletion happens by, and the
/// public URL served to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub storage_key: String,
    pub url: String,
}

/// A blob-store failure. Callers treat the transient-vs-permanent
/// distinction as opaque: any failure aborts the current saga step.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("delete failed: {0}")]
    Delete(String),
}

/// Opaque blob storage: upload returns a stable key + URL, delete removes
/// by key. Implementations must be safe to call from concurrent workers.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Provider label recorded in the asset ledger (e.g. `"s3"`).
    fn provider(&self) -> &'static str;

    /// Store a blob under the given folder, returning its key and URL.
    async fn upload(
        &self,
        data: Vec<u8>,
        file_name: &str,
        folder: &str,
        kind: AssetKind,
    ) -> Result<StoredObject, StorageError>;

    /// Remove a blob by key. Deleting an unknown key is not an error.
    async fn delete(&self, storage_key: &str, kind: AssetKind) -> Result<(), StorageError>;
}
