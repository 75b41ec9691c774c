//! Turns an album document into the values the header tokens stand for.

use crate::models::AlbumDetails;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Long-form release date at the precision the album reports.
///
/// `2000-08-14` becomes `Monday, August 14, 2000`, `2000-08` becomes
/// `August 2000` and a bare year is kept. Dates that do not parse are
/// returned verbatim.
pub fn format_release_date(date: &str, precision: Option<&str>) -> String {
    let precision = precision.unwrap_or(match date.len() {
        4 => "year",
        7 => "month",
        _ => "day",
    });
    let parsed = match precision {
        "year" => return date.to_string(),
        "month" => NaiveDate::parse_from_str(&format!("{}-01", date), "%Y-%m-%d")
            .map(|d| d.format("%B %Y")),
        _ => NaiveDate::parse_from_str(date, "%Y-%m-%d").map(|d| d.format("%A, %B %-d, %Y")),
    };
    match parsed {
        Ok(d) => d.to_string(),
        Err(e) => {
            warn!("unparseable release date {:?} ({}): {}", date, precision, e);
            date.to_string()
        }
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

/// Track counts per disc, ordered by disc number.
pub fn disc_counts(details: &AlbumDetails) -> Vec<usize> {
    let mut per_disc: BTreeMap<u32, usize> = BTreeMap::new();
    for track in &details.tracks.items {
        *per_disc.entry(track.disc_number).or_insert(0) += 1;
    }
    per_disc.into_values().collect()
}

/// `1 hr 5 min` from an hour up, `42 min 7 sec` below that.
pub fn format_length(total_ms: u64) -> String {
    let secs = total_ms.saturating_add(500) / 1000;
    let (hours, mins, secs) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{} hr {} min", hours, mins)
    } else {
        format!("{} min {} sec", mins, secs)
    }
}

/// Values for the default token vocabulary. Values that carry no
/// information for this album (a single disc, no track list) are empty so
/// the filter elides them.
pub fn album_values(details: &AlbumDetails) -> HashMap<String, String> {
    let mut values = HashMap::new();

    values.insert(
        "release_date".to_string(),
        format_release_date(&details.release_date, details.release_date_precision.as_deref()),
    );

    let total = match details.tracks.total as usize {
        0 => details.tracks.items.len(),
        n => n,
    };
    let tracks = if total == 0 { String::new() } else { plural(total, "track", "tracks") };
    values.insert("tracks".to_string(), tracks);

    let discs = disc_counts(details);
    let (disc_text, ratio) = if discs.len() > 1 {
        let ratio = discs.iter().map(|n| n.to_string()).collect::<Vec<_>>().join("/");
        (plural(discs.len(), "disc", "discs"), ratio)
    } else {
        (String::new(), String::new())
    };
    values.insert("discs".to_string(), disc_text);
    values.insert("disc_ratio".to_string(), ratio);

    let length = if details.tracks.items.is_empty() {
        String::new()
    } else {
        let total_ms = details
            .tracks
            .items
            .iter()
            .map(|t| t.duration_ms)
            .fold(0u64, u64::saturating_add);
        format_length(total_ms)
    };
    values.insert("length".to_string(), length);

    values
}
