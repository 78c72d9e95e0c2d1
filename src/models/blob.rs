//! Represents an image payload held in the blob store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Prefix under which every uploaded photo is stored.
pub const UPLOAD_PREFIX: &str = "uploads/";

/// Index entry for a single blob.
///
/// Describes the payload; the bytes themselves live on disk.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct BlobObject {
    /// Path-like key, e.g. `uploads/<uuid>.jpg`.
    pub key: String,

    /// Content type recorded at upload time.
    pub content_type: Option<String>,

    /// Size in bytes.
    pub size_bytes: i64,

    /// MD5 of the payload, hex-encoded.
    pub etag: String,

    /// When the payload was written.
    pub uploaded_at: DateTime<Utc>,
}

impl BlobObject {
    /// Directory markers and empty payloads are not displayable photos.
    pub fn is_displayable(&self) -> bool {
        self.size_bytes > 0 && !self.key.ends_with('/')
    }
}

/// A listing entry as returned by the image API and used by the gallery.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ImageEntry {
    pub key: String,
    pub url: String,
}

impl ImageEntry {
    pub fn for_key(key: impl Into<String>) -> Self {
        let key = key.into();
        let url = image_url(&key);
        Self { key, url }
    }
}

/// Retrieval URL for a blob key. The key is encoded as a single path component.
pub fn image_url(key: &str) -> String {
    format!("/api/images/{}", urlencoding::encode(key))
}
