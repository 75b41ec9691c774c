//! Core library for metadata-customizer: album header filters with token substitution
pub mod api;
pub mod config;
pub mod header;
pub mod metadata;
pub mod models;
pub mod store;
pub mod template;
