//! MetadataStore: the `photos` table plus its normalized subject index.
//!
//! Writes are upserts keyed by `image_key`; every write refreshes
//! `created_at`. The `photo_subjects` rows are rewritten in the same
//! transaction so subject search sees the row and its subjects together.

use super::escape_like;
use crate::models::photo::{PhotoMetadata, PhotoRow, PhotoUpsert};
use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("failed to serialize subjects: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type MetadataResult<T> = Result<T, MetadataError>;

/// Substring filters for [`MetadataStore::search`]. Empty strings match all.
#[derive(Clone, Debug, Default)]
pub struct PhotoFilter {
    pub captured_by: String,
    pub subject: String,
}

impl PhotoFilter {
    pub fn new(captured_by: Option<&str>, subject: Option<&str>) -> Self {
        Self {
            captured_by: captured_by.map(str::trim).unwrap_or_default().to_string(),
            subject: subject.map(str::trim).unwrap_or_default().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.captured_by.is_empty() && self.subject.is_empty()
    }
}

#[derive(Clone)]
pub struct MetadataStore {
    db: SqlitePool,
}

impl MetadataStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert or overwrite the row for `upsert.key`.
    pub async fn upsert(&self, upsert: &PhotoUpsert) -> MetadataResult<()> {
        let subjects_json = serde_json::to_string(&upsert.subjects)?;
        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO photos (image_key, captured_by, subjects, comment, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(image_key) DO UPDATE SET
                captured_by = excluded.captured_by,
                subjects = excluded.subjects,
                comment = excluded.comment,
                created_at = excluded.created_at
            "#,
        )
        .bind(&upsert.key)
        .bind(&upsert.captured_by)
        .bind(&subjects_json)
        .bind(&upsert.comment)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM photo_subjects WHERE image_key = ?")
            .bind(&upsert.key)
            .execute(&mut *tx)
            .await?;

        for (position, subject) in upsert.subjects.iter().enumerate() {
            sqlx::query(
                "INSERT INTO photo_subjects (image_key, position, subject) VALUES (?, ?, ?)",
            )
            .bind(&upsert.key)
            .bind(position as i64)
            .bind(subject)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(key = %upsert.key, subjects = upsert.subjects.len(), "upserted metadata");
        Ok(())
    }

    pub async fn get(&self, key: &str) -> MetadataResult<Option<PhotoMetadata>> {
        let row = sqlx::query_as::<_, PhotoRow>(
            "SELECT image_key, captured_by, subjects, comment, created_at
             FROM photos WHERE image_key = ? LIMIT 1",
        )
        .bind(key)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(PhotoMetadata::from))
    }

    /// Rows whose photographer contains `captured_by` and which have at least
    /// one subject containing `subject`, newest first.
    pub async fn search(&self, filter: &PhotoFilter) -> MetadataResult<Vec<PhotoMetadata>> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT p.image_key, p.captured_by, p.subjects, p.comment, p.created_at
            FROM photos p
            WHERE (?1 = '' OR p.captured_by LIKE ?2 ESCAPE '\')
              AND (?3 = '' OR EXISTS (
                    SELECT 1 FROM photo_subjects s
                    WHERE s.image_key = p.image_key AND s.subject LIKE ?4 ESCAPE '\'
              ))
            ORDER BY p.created_at DESC, p.image_key ASC
            "#,
        )
        .bind(&filter.captured_by)
        .bind(format!("%{}%", escape_like(&filter.captured_by)))
        .bind(&filter.subject)
        .bind(format!("%{}%", escape_like(&filter.subject)))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(PhotoMetadata::from).collect())
    }

    /// Remove the row and its subjects. Returns `true` if a row existed.
    pub async fn delete(&self, key: &str) -> MetadataResult<bool> {
        let mut tx = self.db.begin().await?;
        sqlx::query("DELETE FROM photo_subjects WHERE image_key = ?")
            .bind(key)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM photos WHERE image_key = ?")
            .bind(key)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
