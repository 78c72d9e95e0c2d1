mod common;

use axum::http::{StatusCode, header};
use common::{TestApp, image_path};
use serde_json::json;

mod upload {
    use super::*;

    #[tokio::test]
    async fn allowed_type_yields_generated_key_and_url() {
        let app = TestApp::spawn().await;
        let res = app.post_raw("/api/upload", "image/png", b"PNG_DATA").await;

        assert_eq!(res.status, StatusCode::OK);
        let body = res.json();
        assert_eq!(body["ok"], true);
        let key = body["key"].as_str().unwrap();
        let uuid = key
            .strip_prefix("uploads/")
            .and_then(|rest| rest.strip_suffix(".png"))
            .expect("key should be uploads/<uuid>.png");
        assert!(uuid::Uuid::parse_str(uuid).is_ok());
        assert_eq!(body["url"].as_str().unwrap(), image_path(key));
    }

    #[tokio::test]
    async fn uploaded_bytes_are_served_back() {
        let app = TestApp::spawn().await;
        let key = app.upload("image/jpeg", b"\xff\xd8JPEG").await;
        assert!(key.ends_with(".jpg"));

        let res = app.get(&image_path(&key)).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.header(header::CONTENT_TYPE), Some("image/jpeg"));
        assert_eq!(res.header(header::CONTENT_LENGTH), Some("6"));
        assert_eq!(&res.bytes[..], b"\xff\xd8JPEG");
    }

    #[tokio::test]
    async fn content_type_parameters_are_ignored() {
        let app = TestApp::spawn().await;
        let key = app.upload("Image/WEBP; charset=binary", b"RIFF").await;
        assert!(key.ends_with(".webp"));

        let res = app.get(&format!("/api/images/{}", key)).await;
        assert_eq!(res.header(header::CONTENT_TYPE), Some("image/webp"));
    }

    #[tokio::test]
    async fn disallowed_type_is_415_and_writes_nothing() {
        let app = TestApp::spawn().await;
        let res = app.post_raw("/api/upload", "text/plain", b"hello").await;

        assert_eq!(res.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(res.json()["ok"], false);
        assert_eq!(app.blob_count().await, 0);
    }

    #[tokio::test]
    async fn heic_body_is_refused_with_conversion_hint() {
        let app = TestApp::spawn().await;
        let res = app.post_raw("/api/upload", "image/heic", b"ftypheic").await;

        assert_eq!(res.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(res.json()["error"].as_str().unwrap().contains("JPEG"));
        assert_eq!(app.blob_count().await, 0);
    }

    #[tokio::test]
    async fn identical_uploads_get_distinct_keys() {
        let app = TestApp::spawn().await;
        let a = app.upload("image/png", b"one").await;
        let b = app.upload("image/png", b"one").await;
        assert_ne!(a, b);
        assert_eq!(app.blob_count().await, 2);
    }
}

mod images {
    use super::*;

    #[tokio::test]
    async fn missing_key_is_plain_text_404() {
        let app = TestApp::spawn().await;
        let res = app.get("/api/images/uploads/missing.png").await;

        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.text(), "Not found");
    }

    #[tokio::test]
    async fn untyped_blob_is_served_as_octet_stream() {
        let app = TestApp::spawn().await;
        app.put_blob("uploads/legacy.bin", b"raw", None).await;

        let res = app.get(&image_path("uploads/legacy.bin")).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(
            res.header(header::CONTENT_TYPE),
            Some("application/octet-stream")
        );
        assert_eq!(res.header(header::CONTENT_LENGTH), Some("3"));
        assert_eq!(&res.bytes[..], b"raw");
    }

    #[tokio::test]
    async fn listing_includes_every_key() {
        let app = TestApp::spawn().await;
        let a = app.upload("image/png", b"a").await;
        let b = app.upload("image/jpeg", b"b").await;

        let res = app.get("/api/images").await;
        assert_eq!(res.status, StatusCode::OK);
        let images = res.json()["images"].as_array().unwrap().clone();
        assert_eq!(images.len(), 2);
        for key in [&a, &b] {
            let entry = images
                .iter()
                .find(|img| img["key"] == key.as_str())
                .expect("uploaded key should be listed");
            assert_eq!(entry["url"].as_str().unwrap(), image_path(key));
        }
    }
}

mod metadata {
    use super::*;

    #[tokio::test]
    async fn second_upsert_overwrites_first() {
        let app = TestApp::spawn().await;
        let res = app
            .post_json(
                "/api/metadata",
                json!({"key": "uploads/a.jpg", "capturedBy": "Aiko", "subjects": ["Ren"], "comment": "first"}),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json(), json!({"ok": true}));
        let first = app.get("/api/metadata?key=uploads/a.jpg").await.json();

        app.post_json(
            "/api/metadata",
            json!({"key": "uploads/a.jpg", "capturedBy": "Mio", "subjects": "Sora", "comment": "second"}),
        )
        .await;

        let res = app.get("/api/metadata?key=uploads/a.jpg").await;
        assert_eq!(res.status, StatusCode::OK);
        let body = res.json();
        let data = &body["data"];
        assert_eq!(data["key"], "uploads/a.jpg");
        assert_eq!(data["capturedBy"], "Mio");
        assert_eq!(data["subjects"], json!(["Sora"]));
        assert_eq!(data["comment"], "second");

        let t1: chrono::DateTime<chrono::Utc> =
            serde_json::from_value(first["data"]["createdAt"].clone()).unwrap();
        let t2: chrono::DateTime<chrono::Utc> =
            serde_json::from_value(data["createdAt"].clone()).unwrap();
        assert!(t2 >= t1);

        let all = app.get("/api/metadata").await.json();
        assert_eq!(all["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_subjects_are_removed() {
        let app = TestApp::spawn().await;
        app.post_json(
            "/api/metadata",
            json!({"key": "k", "subjects": ["A", "A", "B"]}),
        )
        .await;

        let data = app.get("/api/metadata?key=k").await.json();
        assert_eq!(data["data"]["subjects"], json!(["A", "B"]));
        assert_eq!(data["data"]["capturedBy"], "");
    }

    #[tokio::test]
    async fn missing_row_is_404() {
        let app = TestApp::spawn().await;
        let res = app.get("/api/metadata?key=nope").await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.json(), json!({"ok": false, "error": "not found"}));
    }

    #[tokio::test]
    async fn corrupt_subjects_read_as_empty_list() {
        let app = TestApp::spawn().await;
        app.post_json("/api/metadata", json!({"key": "k", "subjects": ["A"]}))
            .await;
        sqlx::query("UPDATE photos SET subjects = 'definitely not json' WHERE image_key = 'k'")
            .execute(&app.db)
            .await
            .unwrap();

        let res = app.get("/api/metadata?key=k").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json()["data"]["subjects"], json!([]));
    }

    #[tokio::test]
    async fn empty_search_returns_every_row() {
        let app = TestApp::spawn().await;
        for key in ["a", "b", "c"] {
            app.post_json("/api/metadata", json!({"key": key})).await;
        }

        let res = app.get("/api/metadata?capturedBy=&subject=").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json()["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn search_lists_newest_first() {
        let app = TestApp::spawn().await;
        for key in ["a", "b", "c", "a"] {
            app.post_json("/api/metadata", json!({"key": key})).await;
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let res = app.get("/api/metadata?capturedBy=").await.json();
        let keys: Vec<&str> = res["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["a", "c", "b"]);
    }

    #[tokio::test]
    async fn search_filters_by_photographer_and_subject() {
        let app = TestApp::spawn().await;
        app.post_json("/api/metadata", json!({"key": "a", "capturedBy": "Aiko", "subjects": "Ren, Sora"}))
            .await;
        app.post_json("/api/metadata", json!({"key": "b", "capturedBy": "Mio", "subjects": ["Ren"]}))
            .await;

        let res = app.get("/api/metadata?capturedBy=aik").await.json();
        let keys: Vec<&str> = res["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["a"]);

        let res = app.get("/api/metadata?subject=Ren").await.json();
        assert_eq!(res["data"].as_array().unwrap().len(), 2);

        let res = app.get("/api/metadata?subject=sor&capturedBy=Mio").await.json();
        assert!(res["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_key_is_rejected() {
        let app = TestApp::spawn().await;
        let res = app
            .post_json("/api/metadata", json!({"key": "   ", "capturedBy": "Aiko"}))
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.json()["error"], "key is required");
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let app = TestApp::spawn().await;
        let res = app
            .post_raw("/api/metadata", "application/json", b"{not json")
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.json(), json!({"ok": false, "error": "invalid json"}));
    }

    #[tokio::test]
    async fn responses_carry_cors_headers() {
        let app = TestApp::spawn().await;
        let res = app.get("/api/metadata").await;
        assert_eq!(res.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));

        let res = app.get("/api/metadata?key=nope").await;
        assert_eq!(res.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    }

    #[tokio::test]
    async fn preflight_is_204_with_cors_headers() {
        let app = TestApp::spawn().await;
        for uri in ["/api/metadata", "/api/photos/delete", "/api/upload"] {
            let res = app.options(uri).await;
            assert_eq!(res.status, StatusCode::NO_CONTENT, "{}", uri);
            assert_eq!(res.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
            assert_eq!(
                res.header(header::ACCESS_CONTROL_ALLOW_HEADERS),
                Some("Content-Type")
            );
            assert!(res.bytes.is_empty());
        }
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn nonexistent_key_is_still_ok() {
        let app = TestApp::spawn().await;
        let res = app
            .post_json("/api/photos/delete", json!({"key": "uploads/never.png"}))
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json(), json!({"ok": true}));
    }

    #[tokio::test]
    async fn removes_image_and_metadata() {
        let app = TestApp::spawn().await;
        let key = app.upload("image/png", b"PNG").await;
        app.post_json("/api/metadata", json!({"key": key, "capturedBy": "Aiko"}))
            .await;

        let res = app.post_json("/api/photos/delete", json!({"key": key})).await;
        assert_eq!(res.json(), json!({"ok": true}));

        assert_eq!(app.get(&image_path(&key)).await.status, StatusCode::NOT_FOUND);
        let res = app.get(&format!("/api/metadata?key={}", key)).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);

        let again = app.post_json("/api/photos/delete", json!({"key": key})).await;
        assert_eq!(again.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_key_field_is_rejected() {
        let app = TestApp::spawn().await;
        let res = app.post_json("/api/photos/delete", json!({})).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.json()["error"], "key is required");
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn liveness_and_readiness() {
        let app = TestApp::spawn().await;
        let res = app.get("/healthz").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json(), json!({"status": "ok"}));

        let res = app.get("/readyz").await;
        assert_eq!(res.status, StatusCode::OK);
        let body = res.json();
        assert_eq!(body["checks"]["sqlite"]["ok"], true);
        assert_eq!(body["checks"]["storage"]["ok"], true);
    }
}
