use crate::services::{
    blob_store::BlobStore,
    fs_blob_store::FsBlobStore,
    metadata_store::MetadataStore,
    normalizer::{ImageNormalizer, PassthroughNormalizer},
};
use sqlx::SqlitePool;
use std::{path::PathBuf, sync::Arc};

/// Store handles shared by every handler, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub blobs: Arc<dyn BlobStore>,
    pub metadata: MetadataStore,
    pub normalizer: Arc<dyn ImageNormalizer>,
}

impl AppState {
    /// Disk-backed blobs under `storage_dir`, metadata in `db`, no transcoding.
    pub fn new(db: SqlitePool, storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            blobs: Arc::new(FsBlobStore::new(db.clone(), storage_dir)),
            metadata: MetadataStore::new(db.clone()),
            normalizer: Arc::new(PassthroughNormalizer),
            db,
        }
    }

    pub fn with_normalizer(mut self, normalizer: Arc<dyn ImageNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }
}
