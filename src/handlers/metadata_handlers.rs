//! `/api/metadata`: get-by-key, search and upsert on one route.

use crate::{
    errors::AppError,
    extractors::AppJson,
    models::photo::{PhotoMetadata, PhotoUpsert, SubjectsInput},
    services::metadata_store::PhotoFilter,
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataQuery {
    pub key: Option<String>,
    pub captured_by: Option<String>,
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMetadataReq {
    pub key: Option<String>,
    pub captured_by: Option<String>,
    pub subjects: Option<SubjectsInput>,
    pub comment: Option<String>,
}

impl UpsertMetadataReq {
    /// Trim fields and normalize subjects. Fails when the key is blank.
    pub fn into_upsert(self) -> Result<PhotoUpsert, AppError> {
        let key = self.key.as_deref().map(str::trim).unwrap_or_default();
        if key.is_empty() {
            return Err(AppError::bad_request("key is required"));
        }
        Ok(PhotoUpsert {
            key: key.to_string(),
            captured_by: self.captured_by.unwrap_or_default().trim().to_string(),
            subjects: self.subjects.map(SubjectsInput::normalize).unwrap_or_default(),
            comment: self.comment.unwrap_or_default().trim().to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub ok: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { ok: true })
    }
}

/// `GET /api/metadata`: single row when `key` is given, otherwise a search.
pub async fn get_metadata(
    State(state): State<AppState>,
    Query(q): Query<MetadataQuery>,
) -> Result<Response, AppError> {
    let key = q.key.as_deref().map(str::trim).unwrap_or_default();

    if !key.is_empty() {
        let row = state
            .metadata
            .get(key)
            .await
            .map_err(|err| AppError::backend(err, "failed to read metadata"))?
            .ok_or_else(|| AppError::not_found("not found"))?;
        return Ok(Json(DataResponse { ok: true, data: row }).into_response());
    }

    let filter = PhotoFilter::new(q.captured_by.as_deref(), q.subject.as_deref());
    let rows: Vec<PhotoMetadata> = state
        .metadata
        .search(&filter)
        .await
        .map_err(|err| AppError::backend(err, "failed to read metadata"))?;

    Ok(Json(DataResponse { ok: true, data: rows }).into_response())
}

/// `POST /api/metadata`: insert or overwrite one row.
pub async fn upsert_metadata(
    State(state): State<AppState>,
    AppJson(req): AppJson<UpsertMetadataReq>,
) -> Result<Json<OkResponse>, AppError> {
    let upsert = req.into_upsert()?;
    state
        .metadata
        .upsert(&upsert)
        .await
        .map_err(|err| AppError::backend(err, "failed to write metadata"))?;

    tracing::info!(key = %upsert.key, "metadata saved");
    Ok(OkResponse::ok())
}

/// `OPTIONS` on the API routes. CORS headers are added by the router layer.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
