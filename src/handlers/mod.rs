//! HTTP handlers. Storage concerns are delegated to the stores in `AppState`.

pub mod delete_handlers;
pub mod gallery_handlers;
pub mod health_handlers;
pub mod image_handlers;
pub mod metadata_handlers;
pub mod upload_handlers;
