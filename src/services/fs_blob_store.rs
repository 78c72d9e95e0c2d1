//! FsBlobStore: blob payloads on local disk, indexed in SQLite.
//!
//! Payloads are sharded beneath `base_path/{shard}/{shard}/{key}` where the
//! shards are the first two bytes of MD5(key). The `blobs` table records the
//! content type, size, etag and upload time for each key.

use super::blob_store::{BlobStore, BlobStoreError, BlobStoreResult, BoxReader};
use super::escape_like;
use crate::models::blob::BlobObject;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use sqlx::SqlitePool;
use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use tokio::{
    fs::{self, File},
    io::{AsyncWriteExt, BufReader},
};
use tracing::debug;
use uuid::Uuid;

const MAX_KEY_LEN: usize = 1024;

#[derive(Clone)]
pub struct FsBlobStore {
    /// Shared SQLite pool holding the blob index.
    pub db: SqlitePool,

    /// Base directory on disk where payloads are stored.
    pub base_path: PathBuf,
}

impl FsBlobStore {
    pub fn new(db: SqlitePool, base_path: impl Into<PathBuf>) -> Self {
        Self {
            db,
            base_path: base_path.into(),
        }
    }

    /// Rejects keys that could escape `base_path` or confuse the shard layout.
    fn ensure_key_safe(key: &str) -> BlobStoreResult<()> {
        if key.is_empty() || key.len() > MAX_KEY_LEN {
            return Err(BlobStoreError::InvalidKey);
        }
        if key.starts_with('/') || key.split('/').any(|seg| seg == "..") {
            return Err(BlobStoreError::InvalidKey);
        }
        if key.bytes().any(|b| b.is_ascii_control() || b == b'\\') {
            return Err(BlobStoreError::InvalidKey);
        }
        Ok(())
    }

    fn shards(key: &str) -> (String, String) {
        let digest = md5::compute(key);
        (format!("{:02x}", digest[0]), format!("{:02x}", digest[1]))
    }

    fn payload_path(&self, key: &str) -> PathBuf {
        let (shard_a, shard_b) = Self::shards(key);
        let mut path = self.base_path.clone();
        path.push(shard_a);
        path.push(shard_b);
        path.push(key);
        path
    }

    async fn fetch(&self, key: &str) -> BlobStoreResult<Option<BlobObject>> {
        let row = sqlx::query_as::<_, BlobObject>(
            "SELECT key, content_type, size_bytes, etag, uploaded_at FROM blobs WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    /// Write `data` to a temp file beside `path`, fsync, then rename into place.
    async fn write_payload(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| io::Error::new(ErrorKind::Other, "payload path missing parent"))?;
        fs::create_dir_all(parent).await?;
        let tmp_path = parent.join(format!(".tmp-{}", Uuid::new_v4()));

        let result = async {
            let mut file = File::create(&tmp_path).await?;
            file.write_all(data).await?;
            file.flush().await?;
            file.sync_all().await?;
            fs::rename(&tmp_path, path).await
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&tmp_path).await;
        }
        result
    }

    /// Remove empty shard directories up to (not including) `base_path`.
    async fn prune_empty_dirs(&self, start: &Path) {
        let mut current = start.to_path_buf();
        while current.starts_with(&self.base_path) && current != self.base_path {
            match fs::remove_dir(&current).await {
                Ok(_) => match current.parent() {
                    Some(parent) => current = parent.to_path_buf(),
                    None => break,
                },
                Err(err) if err.kind() == ErrorKind::NotFound => break,
                Err(err) if err.kind() == ErrorKind::DirectoryNotEmpty => break,
                Err(err) => {
                    debug!("failed to prune directory {}: {}", current.display(), err);
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<String>,
    ) -> BlobStoreResult<BlobObject> {
        Self::ensure_key_safe(key)?;
        let path = self.payload_path(key);
        let etag = format!("{:x}", md5::compute(&data));

        // Commit the row only after the payload is in place.
        let mut tx = self.db.begin().await?;
        let obj = sqlx::query_as::<_, BlobObject>(
            r#"
            INSERT INTO blobs (key, content_type, size_bytes, etag, uploaded_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                content_type = excluded.content_type,
                size_bytes = excluded.size_bytes,
                etag = excluded.etag,
                uploaded_at = excluded.uploaded_at
            RETURNING key, content_type, size_bytes, etag, uploaded_at
            "#,
        )
        .bind(key)
        .bind(content_type)
        .bind(data.len() as i64)
        .bind(&etag)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        self.write_payload(&path, &data).await?;
        tx.commit().await?;

        debug!(key, size = obj.size_bytes, "stored blob");
        Ok(obj)
    }

    async fn get(&self, key: &str) -> BlobStoreResult<(BlobObject, BoxReader)> {
        Self::ensure_key_safe(key)?;
        let object = self
            .fetch(key)
            .await?
            .ok_or_else(|| BlobStoreError::NotFound(key.to_string()))?;

        let file = File::open(self.payload_path(key)).await.map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                BlobStoreError::NotFound(key.to_string())
            } else {
                BlobStoreError::Io(err)
            }
        })?;

        Ok((object, Box::new(BufReader::new(file))))
    }

    async fn head(&self, key: &str) -> BlobStoreResult<Option<BlobObject>> {
        if Self::ensure_key_safe(key).is_err() {
            return Ok(None);
        }
        self.fetch(key).await
    }

    async fn list(&self, prefix: &str) -> BlobStoreResult<Vec<BlobObject>> {
        let rows = sqlx::query_as::<_, BlobObject>(
            "SELECT key, content_type, size_bytes, etag, uploaded_at FROM blobs
             WHERE key LIKE ? ESCAPE '\\'
             ORDER BY key ASC",
        )
        .bind(format!("{}%", escape_like(prefix)))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn delete(&self, key: &str) -> BlobStoreResult<bool> {
        if Self::ensure_key_safe(key).is_err() {
            return Ok(false);
        }

        let mut tx = self.db.begin().await?;
        let result = sqlx::query("DELETE FROM blobs WHERE key = ?")
            .bind(key)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        let path = self.payload_path(key);
        match fs::remove_file(&path).await {
            Ok(_) => debug!("removed payload {}", path.display()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("payload {} already missing", path.display());
            }
            Err(err) => return Err(BlobStoreError::Io(err)),
        }
        tx.commit().await?;

        if let Some(parent) = path.parent() {
            self.prune_empty_dirs(parent).await;
        }

        Ok(true)
    }

    async fn probe(&self) -> BlobStoreResult<()> {
        fs::create_dir_all(&self.base_path).await?;
        let tmp_path = self.base_path.join(format!(".readyz-{}", Uuid::new_v4()));
        fs::write(&tmp_path, b"readyz").await?;
        let read = fs::read(&tmp_path).await;
        let _ = fs::remove_file(&tmp_path).await;
        if read? != b"readyz" {
            return Err(BlobStoreError::Io(io::Error::new(
                ErrorKind::Other,
                "probe file content mismatch",
            )));
        }
        Ok(())
    }
}
