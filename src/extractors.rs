use crate::errors::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// A JSON body extractor that ignores the declared content type and turns any
/// read or parse failure into a 400 `invalid json`.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::bad_request("invalid json"))?;
        let value = serde_json::from_slice(&body).map_err(|err| {
            tracing::debug!(error = %err, "rejected request body");
            AppError::bad_request("invalid json")
        })?;
        Ok(AppJson(value))
    }
}
