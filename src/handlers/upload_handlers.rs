//! `POST /api/upload`: raw image body in, generated key out.

use crate::{
    errors::AppError,
    models::blob::{UPLOAD_PREFIX, image_url},
    services::normalizer::extension_for,
    state::AppState,
};
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub ok: bool,
    pub key: String,
    pub url: String,
}

/// Store the request body under `uploads/<uuid>.<ext>`.
///
/// The declared content type must be on the allow-list after normalization,
/// otherwise the request fails with 415 and nothing is written.
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadResponse>, AppError> {
    let declared = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let image = state
        .normalizer
        .normalize(body, declared)
        .map_err(|err| AppError::unsupported_media_type(err.to_string()))?;

    let ext = extension_for(&image.content_type).ok_or_else(|| {
        AppError::unsupported_media_type(format!(
            "unsupported media type: {}",
            image.content_type
        ))
    })?;

    let key = format!("{}{}.{}", UPLOAD_PREFIX, Uuid::new_v4(), ext);
    let stored = state
        .blobs
        .put(&key, image.bytes, Some(image.content_type))
        .await
        .map_err(|err| AppError::backend(err, "failed to store image"))?;

    tracing::info!(
        key = %stored.key,
        size = stored.size_bytes,
        converted = image.converted,
        "image uploaded"
    );

    Ok(Json(UploadResponse {
        ok: true,
        url: image_url(&key),
        key,
    }))
}
