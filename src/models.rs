use serde::{Deserialize, Serialize};

/// Album document as returned by the Spotify Web API `albums/{id}` endpoint.
/// Only the fields the header needs are kept; everything else is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlbumDetails {
    pub release_date: String,
    // "day", "month" or "year"
    #[serde(default)]
    pub release_date_precision: Option<String>,
    pub tracks: TrackPage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackPage {
    pub total: u32,
    #[serde(default)]
    pub items: Vec<TrackItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackItem {
    #[serde(default = "default_disc_number")]
    pub disc_number: u32,
    #[serde(default)]
    pub duration_ms: u64,
}

fn default_disc_number() -> u32 { 1 }

impl AlbumDetails {
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let details: AlbumDetails = serde_json::from_str(s)?;
        Ok(details)
    }
}

/// Everything the header renderer needs: the rows, and whether they replace
/// the page's own metadata rows or sit next to them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    pub lines: Vec<HeaderLine>,
    pub replace_default_metadata: bool,
}

/// One rendered header row handed to whatever draws the header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeaderLine {
    pub icon: Option<String>,
    pub text: String,
}
