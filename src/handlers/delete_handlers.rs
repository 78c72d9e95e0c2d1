//! `POST /api/photos/delete`: idempotent removal of a photo and its metadata.

use super::metadata_handlers::OkResponse;
use crate::{errors::AppError, extractors::AppJson, state::AppState};
use axum::{Json, extract::State};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DeletePhotoReq {
    pub key: Option<String>,
}

/// Delete the blob, then the metadata row. Missing data on either side is
/// still a success; only backend failures produce an error.
pub async fn delete_photo(
    State(state): State<AppState>,
    AppJson(req): AppJson<DeletePhotoReq>,
) -> Result<Json<OkResponse>, AppError> {
    let key = req.key.as_deref().map(str::trim).unwrap_or_default();
    if key.is_empty() {
        return Err(AppError::bad_request("key is required"));
    }

    let blob_deleted = state
        .blobs
        .delete(key)
        .await
        .map_err(|err| AppError::backend(err, "failed to delete"))?;
    let row_deleted = state
        .metadata
        .delete(key)
        .await
        .map_err(|err| AppError::backend(err, "failed to delete"))?;

    tracing::info!(key, blob_deleted, row_deleted, "photo deleted");
    Ok(OkResponse::ok())
}
