//! Photo metadata: photographer, subjects and a free-text comment per image key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Raw `photos` row as stored in SQLite. `subjects` is JSON text.
#[derive(Clone, FromRow, Debug)]
pub struct PhotoRow {
    pub image_key: String,
    pub captured_by: String,
    pub subjects: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Metadata as exposed over the API and rendered on pages.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMetadata {
    pub key: String,
    pub captured_by: String,
    pub subjects: Vec<String>,
    pub comment: String,
    /// Refreshed on every write, so this is effectively "last modified".
    pub created_at: DateTime<Utc>,
}

impl From<PhotoRow> for PhotoMetadata {
    fn from(row: PhotoRow) -> Self {
        Self {
            subjects: parse_subjects(&row.subjects),
            key: row.image_key,
            captured_by: row.captured_by,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

/// Subjects as clients send them: a JSON array or one delimited string.
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum SubjectsInput {
    List(Vec<String>),
    Text(String),
}

impl SubjectsInput {
    /// Trimmed, non-empty, deduplicated (case-sensitive, first occurrence wins).
    pub fn normalize(self) -> Vec<String> {
        match self {
            SubjectsInput::List(items) => dedup_subjects(items),
            SubjectsInput::Text(text) => {
                dedup_subjects(text.split([',', '\n']).map(str::to_string))
            }
        }
    }
}

/// Validated write request for one photo's metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct PhotoUpsert {
    pub key: String,
    pub captured_by: String,
    pub subjects: Vec<String>,
    pub comment: String,
}

fn dedup_subjects<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() || out.iter().any(|s| s == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}

/// Parse stored subjects JSON. Anything malformed yields an empty list.
pub fn parse_subjects(raw: &str) -> Vec<String> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => {
                    let trimmed = s.trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
