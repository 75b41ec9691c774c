pub mod file;
pub mod mock;

use crate::models::AlbumDetails;
use anyhow::Result;

/// Source of album documents for the header.
/// Implementations: file::FileProvider, mock::MockProvider.
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the album document for `album_id`.
    async fn album(&self, album_id: &str) -> Result<AlbumDetails>;

    /// Return the provider's name (for logging)
    fn name(&self) -> &str;
}
