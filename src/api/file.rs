use super::MetadataProvider;
use crate::models::AlbumDetails;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Reads previously saved album documents from `<dir>/<album_id>.json`.
pub struct FileProvider {
    dir: PathBuf,
}

impl FileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, album_id: &str) -> Result<PathBuf> {
        // ids are base62 on Spotify; refuse anything that could leave `dir`
        let safe = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
        if album_id.is_empty() || !album_id.chars().all(safe) {
            bail!("invalid album id {:?}", album_id);
        }
        Ok(self.dir.join(format!("{}.json", album_id)))
    }
}

#[async_trait]
impl MetadataProvider for FileProvider {
    fn name(&self) -> &str {
        "file"
    }

    async fn album(&self, album_id: &str) -> Result<AlbumDetails> {
        let path = self.path_for(album_id)?;
        debug!("FileProvider: reading {}", path.display());
        let s = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading album document {}", path.display()))?;
        AlbumDetails::from_json(&s)
            .with_context(|| format!("parsing album document {}", path.display()))
    }
}
