//! Core data models for the gallery.
//!
//! Blobs describe stored image payloads; photos describe the metadata rows
//! attached to them by key. Both map to SQLite tables via `sqlx::FromRow`
//! and serialize as JSON via `serde`.

pub mod blob;
pub mod photo;
