//! Image listing and byte serving.

use crate::{
    errors::AppError,
    models::blob::ImageEntry,
    services::blob_store::BlobStoreError,
    state::AppState,
};
use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tokio_util::io::ReaderStream;

#[derive(Debug, Serialize)]
pub struct ImageListResponse {
    pub images: Vec<ImageEntry>,
}

/// `GET /api/images`: every key in the store, unfiltered.
pub async fn list_images(
    State(state): State<AppState>,
) -> Result<Json<ImageListResponse>, AppError> {
    let objects = state
        .blobs
        .list("")
        .await
        .map_err(|err| AppError::backend(err, "failed to list images"))?;

    Ok(Json(ImageListResponse {
        images: objects
            .into_iter()
            .map(|o| ImageEntry::for_key(o.key))
            .collect(),
    }))
}

/// `GET /api/images/{*key}`: stream the payload with its stored content type.
pub async fn get_image(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let (meta, reader) = match state.blobs.get(&key).await {
        Ok(found) => found,
        Err(BlobStoreError::NotFound(_) | BlobStoreError::InvalidKey) => {
            return Ok((StatusCode::NOT_FOUND, "Not found").into_response());
        }
        Err(err) => return Err(AppError::backend(err, "failed to read image")),
    };

    let mut response = Response::new(Body::from_stream(ReaderStream::new(reader)));
    set_image_headers(
        response.headers_mut(),
        meta.content_type.as_deref(),
        meta.size_bytes,
    );
    Ok(response)
}

fn set_image_headers(headers: &mut HeaderMap, content_type: Option<&str>, size: i64) {
    let fallback = HeaderValue::from_static("application/octet-stream");
    let value = content_type
        .and_then(|ct| HeaderValue::from_str(ct).ok())
        .unwrap_or(fallback);
    headers.insert(header::CONTENT_TYPE, value);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size.max(0)));
}
