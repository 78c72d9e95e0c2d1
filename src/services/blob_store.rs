//! Blob store seam: path-keyed image payloads with a recorded content type.

use crate::models::blob::BlobObject;
use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("blob `{0}` not found")]
    NotFound(String),
    #[error("invalid blob key")]
    InvalidKey,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type BlobStoreResult<T> = Result<T, BlobStoreError>;

/// Object storage keyed by string path.
///
/// Deleting or heading a missing key is not an error; reading one is.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key`, replacing any previous payload.
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<String>,
    ) -> BlobStoreResult<BlobObject>;

    /// Open a blob for streaming. Returns `NotFound` if absent.
    async fn get(&self, key: &str) -> BlobStoreResult<(BlobObject, BoxReader)>;

    /// Metadata only, without touching the payload.
    async fn head(&self, key: &str) -> BlobStoreResult<Option<BlobObject>>;

    /// All blobs whose key starts with `prefix`, ordered by key.
    async fn list(&self, prefix: &str) -> BlobStoreResult<Vec<BlobObject>>;

    /// Remove a blob. Returns `true` if something was deleted.
    async fn delete(&self, key: &str) -> BlobStoreResult<bool>;

    /// Readiness probe for the payload backend.
    async fn probe(&self) -> BlobStoreResult<()> {
        Ok(())
    }
}
