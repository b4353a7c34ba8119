//! Chart entry key normalization.
//!
//! Entry keys identify the same artist, track, or album across members and weeks even
//! when the scrobble API reports differing capitalization. Keys are derived from
//! lowercased names, with track and album keys additionally qualified by artist so two
//! songs sharing a title stay distinct.

use entity::types::ChartCategory;

/// Separator between the name and artist components of track and album keys.
const KEY_SEPARATOR: char = '|';

/// Derives the deduplication key for a chart entry.
///
/// Artist entries are keyed by lowercased name alone. Track and album entries are keyed
/// by lowercased name and lowercased artist joined with `|`, so entries merge across
/// members exactly when both components match case-insensitively.
pub fn entry_key(category: ChartCategory, name: &str, artist: Option<&str>) -> String {
    match category {
        ChartCategory::Artist => name.to_lowercase(),
        ChartCategory::Track | ChartCategory::Album => {
            let artist = artist.unwrap_or_default();

            format!(
                "{}{}{}",
                name.to_lowercase(),
                KEY_SEPARATOR,
                artist.to_lowercase()
            )
        }
    }
}
