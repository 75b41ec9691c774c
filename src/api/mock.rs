use super::MetadataProvider;
use crate::models::AlbumDetails;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::info;

/// In-memory provider used in tests and by embedders that already hold
/// album documents. Unknown ids are an error.
#[derive(Default)]
pub struct MockProvider {
    albums: HashMap<String, AlbumDetails>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_album(mut self, album_id: &str, details: AlbumDetails) -> Self {
        self.albums.insert(album_id.to_string(), details);
        self
    }
}

#[async_trait]
impl MetadataProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn album(&self, album_id: &str) -> Result<AlbumDetails> {
        info!("MockProvider: album {}", album_id);
        self.albums
            .get(album_id)
            .cloned()
            .ok_or_else(|| anyhow!("mock provider has no album {}", album_id))
    }
}
