//! Image normalization seam applied to upload bodies before validation.
//!
//! HEIC/HEIF conversion happens in the browser. The server ships
//! [`PassthroughNormalizer`], which only canonicalizes the declared content
//! type; a transcoding implementation can be swapped in through
//! [`ImageNormalizer`] without touching the upload handler.

use bytes::Bytes;
use thiserror::Error;

/// Content types accepted by the upload endpoint, with their key extension.
pub const ALLOWED_IMAGE_TYPES: [(&str, &str); 3] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

/// HEIC/HEIF MIME types that require conversion before they can be stored.
const HEIF_TYPES: [&str; 4] = [
    "image/heic",
    "image/heif",
    "image/heic-sequence",
    "image/heif-sequence",
];

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    /// The decoder cannot handle this encoding (e.g. 10-bit HEVC in HEIC).
    #[error("this {0} image cannot be decoded here; export it as JPEG and upload again")]
    UnsupportedEncoding(String),
    #[error("image conversion failed: {0}")]
    Failed(String),
}

/// An upload body after normalization.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub bytes: Bytes,
    pub content_type: String,
    pub converted: bool,
}

pub trait ImageNormalizer: Send + Sync {
    fn normalize(&self, bytes: Bytes, content_type: &str)
    -> Result<NormalizedImage, NormalizeError>;
}

/// No server-side transcoding. HEIF bodies are refused as undecodable.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughNormalizer;

impl ImageNormalizer for PassthroughNormalizer {
    fn normalize(
        &self,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<NormalizedImage, NormalizeError> {
        let content_type = canonical_content_type(content_type);
        if HEIF_TYPES.contains(&content_type.as_str()) {
            return Err(NormalizeError::UnsupportedEncoding(content_type));
        }
        Ok(NormalizedImage {
            bytes,
            content_type,
            converted: false,
        })
    }
}

/// Strip parameters and lowercase: `Image/JPEG; q=1` becomes `image/jpeg`.
pub fn canonical_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Key extension for an allowed content type, `None` when not allowed.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    ALLOWED_IMAGE_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
}
