//! Wire-format models for scrobble API responses.
//!
//! The upstream weekly chart endpoints wrap their payloads in a per-category envelope
//! and serialize numbers as JSON strings, so every row type here carries lenient
//! deserializers and converts into the normalized [`TopListItem`] the rest of the
//! pipeline consumes.

use serde::{Deserialize, Deserializer};

/// A normalized row from a member's weekly top list.
///
/// Rows arrive ordered by play count; `rank` is the 1-based position reported by the
/// scrobble service.
#[derive(Debug, Clone, PartialEq)]
pub struct TopListItem {
    /// 1-based rank within the member's own weekly list.
    pub rank: i32,
    /// Display name of the artist, track, or album.
    pub name: String,
    /// Artist credit, present for tracks and albums.
    pub artist: Option<String>,
    /// Plays the member logged for this entry during the week.
    pub playcount: i64,
}

/// Error payload returned with a 200 status by some scrobble API failures.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    /// Upstream error code.
    pub error: i32,
    /// Human-readable upstream error message.
    #[serde(default)]
    pub message: String,
}

fn i64_from_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

fn i32_from_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    i64_from_string(deserializer).map(|n| n as i32)
}

/// Rank attribute attached to every chart row.
#[derive(Debug, Deserialize)]
pub struct RankAttr {
    /// 1-based rank within the weekly list.
    #[serde(deserialize_with = "i32_from_string")]
    pub rank: i32,
}

/// Artist credit object used by track and album rows.
#[derive(Debug, Deserialize)]
pub struct ArtistRef {
    /// Artist display name.
    #[serde(rename = "#text")]
    pub name: String,
}

/// One artist row in a weekly artist chart.
#[derive(Debug, Deserialize)]
pub struct ArtistRow {
    /// Artist display name.
    pub name: String,
    /// Plays logged during the week.
    #[serde(deserialize_with = "i64_from_string")]
    pub playcount: i64,
    /// Rank metadata.
    #[serde(rename = "@attr")]
    pub attr: RankAttr,
}

/// One track or album row in a weekly chart.
#[derive(Debug, Deserialize)]
pub struct CreditedRow {
    /// Track or album display name.
    pub name: String,
    /// Artist credit.
    pub artist: ArtistRef,
    /// Plays logged during the week.
    #[serde(deserialize_with = "i64_from_string")]
    pub playcount: i64,
    /// Rank metadata.
    #[serde(rename = "@attr")]
    pub attr: RankAttr,
}

/// Envelope around a weekly artist chart payload.
#[derive(Debug, Deserialize)]
pub struct WeeklyArtistChartResponse {
    /// Chart payload.
    pub weeklyartistchart: WeeklyArtistChart,
}

/// Weekly artist chart payload.
#[derive(Debug, Deserialize)]
pub struct WeeklyArtistChart {
    /// Ranked artist rows, absent when the member logged no plays.
    #[serde(default)]
    pub artist: Vec<ArtistRow>,
}

impl WeeklyArtistChart {
    /// Converts upstream rows into normalized top list items.
    pub fn into_items(self) -> Vec<TopListItem> {
        self.artist
            .into_iter()
            .map(|row| TopListItem {
                rank: row.attr.rank,
                name: row.name,
                artist: None,
                playcount: row.playcount,
            })
            .collect()
    }
}

/// Envelope around a weekly track chart payload.
#[derive(Debug, Deserialize)]
pub struct WeeklyTrackChartResponse {
    /// Chart payload.
    pub weeklytrackchart: WeeklyTrackChart,
}

/// Weekly track chart payload.
#[derive(Debug, Deserialize)]
pub struct WeeklyTrackChart {
    /// Ranked track rows, absent when the member logged no plays.
    #[serde(default)]
    pub track: Vec<CreditedRow>,
}

impl WeeklyTrackChart {
    /// Converts upstream rows into normalized top list items.
    pub fn into_items(self) -> Vec<TopListItem> {
        credited_items(self.track)
    }
}

/// Envelope around a weekly album chart payload.
#[derive(Debug, Deserialize)]
pub struct WeeklyAlbumChartResponse {
    /// Chart payload.
    pub weeklyalbumchart: WeeklyAlbumChart,
}

/// Weekly album chart payload.
#[derive(Debug, Deserialize)]
pub struct WeeklyAlbumChart {
    /// Ranked album rows, absent when the member logged no plays.
    #[serde(default)]
    pub album: Vec<CreditedRow>,
}

impl WeeklyAlbumChart {
    /// Converts upstream rows into normalized top list items.
    pub fn into_items(self) -> Vec<TopListItem> {
        credited_items(self.album)
    }
}

fn credited_items(rows: Vec<CreditedRow>) -> Vec<TopListItem> {
    rows.into_iter()
        .map(|row| TopListItem {
            rank: row.attr.rank,
            name: row.name,
            artist: Some(row.artist.name),
            playcount: row.playcount,
        })
        .collect()
}
