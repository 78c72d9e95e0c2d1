//! Memorial photo gallery: image uploads in a blob store, per-photo metadata
//! in SQLite, and server-rendered gallery pages.

pub mod config;
pub mod db;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;
