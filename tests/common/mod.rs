#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use memorial_gallery::{
    db,
    routes::routes,
    services::{blob_store::BlobStore, fs_blob_store::FsBlobStore},
    state::AppState,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).expect("response body should be JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Router over an in-memory database and a temporary blob directory.
pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    pub storage: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let storage = tempfile::tempdir().expect("temp dir should be created");
        let db = db::connect_in_memory()
            .await
            .expect("in-memory database should open");
        let router = routes::routes(AppState::new(db.clone(), storage.path()));
        Self {
            router,
            db,
            storage,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("router should not fail");
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        TestResponse {
            status,
            headers,
            bytes,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_raw(&self, uri: &str, content_type: &str, body: &'static [u8]) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn options(&self, uri: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::OPTIONS)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Upload `bytes` and return the generated key.
    pub async fn upload(&self, content_type: &str, bytes: &'static [u8]) -> String {
        let res = self.post_raw("/api/upload", content_type, bytes).await;
        assert_eq!(res.status, StatusCode::OK, "upload failed: {}", res.text());
        res.json()["key"]
            .as_str()
            .expect("upload response should carry a key")
            .to_string()
    }

    /// Store a blob directly, bypassing the upload allow-list.
    pub async fn put_blob(&self, key: &str, bytes: &'static [u8], content_type: Option<&str>) {
        FsBlobStore::new(self.db.clone(), self.storage.path())
            .put(key, Bytes::from_static(bytes), content_type.map(str::to_string))
            .await
            .expect("blob should be stored");
    }

    pub async fn blob_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM blobs")
            .fetch_one(&self.db)
            .await
            .unwrap()
    }
}

/// Percent-encode a key the way the upload response does.
pub fn image_path(key: &str) -> String {
    format!("/api/images/{}", urlencoding::encode(key))
}
