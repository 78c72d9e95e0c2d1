//! Server-rendered pages: home, gallery list and photo detail.

use crate::{
    errors::AppError,
    models::blob::{ImageEntry, UPLOAD_PREFIX},
    services::metadata_store::PhotoFilter,
    state::AppState,
    views::pages,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryQuery {
    pub captured_by: Option<String>,
    pub subject: Option<String>,
}

/// `GET /`
pub async fn home() -> Html<String> {
    pages::home()
}

/// `GET /gallery`: uploaded photos, optionally narrowed by a metadata search.
pub async fn gallery_list(
    State(state): State<AppState>,
    Query(q): Query<GalleryQuery>,
) -> Result<Html<String>, AppError> {
    let objects = state
        .blobs
        .list(UPLOAD_PREFIX)
        .await
        .map_err(|err| AppError::backend(err, "failed to list images"))?;

    let filter = PhotoFilter::new(q.captured_by.as_deref(), q.subject.as_deref());
    let allowed: Option<HashSet<String>> = if filter.is_empty() {
        None
    } else {
        let rows = state
            .metadata
            .search(&filter)
            .await
            .map_err(|err| AppError::backend(err, "failed to read metadata"))?;
        Some(rows.into_iter().map(|row| row.key).collect())
    };

    let images: Vec<ImageEntry> = objects
        .into_iter()
        .filter(|o| o.is_displayable())
        .filter(|o| allowed.as_ref().is_none_or(|keys| keys.contains(&o.key)))
        .map(|o| ImageEntry::for_key(o.key))
        .collect();

    Ok(pages::gallery(&images, &filter))
}

/// `GET /gallery/{*key}`: one photo with its metadata, editor and delete action.
pub async fn gallery_detail(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let Some(blob) = state
        .blobs
        .head(&key)
        .await
        .map_err(|err| AppError::backend(err, "failed to read image"))?
    else {
        return Ok((StatusCode::NOT_FOUND, pages::not_found()).into_response());
    };

    let metadata = state
        .metadata
        .get(&key)
        .await
        .map_err(|err| AppError::backend(err, "failed to read metadata"))?;

    Ok(pages::detail(&blob, metadata.as_ref()).into_response())
}
