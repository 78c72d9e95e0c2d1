//! Defines the HTTP surface of the gallery.
//!
//! ## Structure
//! - **API** (JSON, permissive CORS, `OPTIONS` → 204)
//!   - `POST /api/upload`: store a raw image body
//!   - `GET  /api/images`: list every stored key
//!   - `GET  /api/images/{*key}`: image bytes
//!   - `GET  /api/metadata`: get by `?key=` or search by `?capturedBy=&subject=`
//!   - `POST /api/metadata`: upsert
//!   - `POST /api/photos/delete`: delete blob and metadata
//!
//! - **Pages**
//!   - `GET /`, `GET /gallery`, `GET /gallery/{*key}`
//!
//! The wildcard `*key` allows nested keys like `uploads/<uuid>.jpg`, whether
//! sent with literal or percent-encoded slashes.

use crate::{
    handlers::{
        delete_handlers::delete_photo,
        gallery_handlers::{gallery_detail, gallery_list, home},
        health_handlers::{healthz, readyz},
        image_handlers::{get_image, list_images},
        metadata_handlers::{get_metadata, preflight, upsert_metadata},
        upload_handlers::upload_image,
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, header},
    routing::{get, post},
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// Headers attached to every API response.
const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

/// API routes under `/api`.
fn api_routes() -> Router<AppState> {
    let router = Router::new()
        .route(
            "/api/upload",
            post(upload_image)
                .options(preflight)
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/api/images", get(list_images))
        .route("/api/images/{*key}", get(get_image))
        .route(
            "/api/metadata",
            get(get_metadata).post(upsert_metadata).options(preflight),
        )
        .route("/api/photos/delete", post(delete_photo).options(preflight));

    CORS_HEADERS
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(
                name,
                HeaderValue::from_static(value),
            ))
        })
}

/// Server-rendered pages and health probes.
fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/", get(home))
        .route("/gallery", get(gallery_list))
        .route("/gallery/{*key}", get(gallery_detail))
}

/// Build the full application router with state attached.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .merge(page_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
