//! Cross-member aggregation of scored lists into ranked weekly charts.
//!
//! Aggregation is pure chart math over already-scored input. Each category is
//! aggregated independently; the caller runs this once per category per week.

use std::collections::HashMap;

use entity::types::ChartMode;

use crate::server::service::scoring::ScoredEntry;

/// One member's share of an aggregated chart entry.
///
/// `score` is the member's rank-derived score for the entry, independent of
/// the aggregation mode, so MVP and contribution accounting read the same
/// numbers whichever mode the chart was built with.
#[derive(Debug, Clone, PartialEq)]
pub struct Contributor {
    /// Member who listened to the entry
    pub member_id: i32,
    /// The member's rank-derived score for the entry
    pub score: f64,
    /// The member's plays of the entry this week
    pub playcount: i64,
}

/// One ranked entry of a weekly group chart
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedEntry {
    /// 1-based chart position
    pub position: i32,
    /// Normalized entry key
    pub entry_key: String,
    /// Display name, taken from the contributor with the most plays
    pub name: String,
    /// Credited artist for tracks and albums
    pub artist: Option<String>,
    /// Aggregate value under the chart mode
    pub score: f64,
    /// Total plays across all contributors
    pub playcount: i64,
    /// Per-member shares, largest score first
    pub contributors: Vec<Contributor>,
}

struct Accumulated {
    name: String,
    artist: Option<String>,
    value: f64,
    playcount: i64,
    contributors: Vec<Contributor>,
    display_playcount: i64,
    display_member_id: i32,
}

/// Aggregates all members' scored lists for one category into a ranked chart
///
/// Entries are grouped by entry key, combined according to `mode`, sorted by
/// aggregate value with ties broken by total playcount and then entry key,
/// and truncated to `chart_size`. Per-member shares are retained on every
/// surviving entry for downstream attribution.
pub fn aggregate_category(
    member_lists: &[(i32, Vec<ScoredEntry>)],
    mode: ChartMode,
    chart_size: i32,
) -> Vec<AggregatedEntry> {
    let mut grouped: HashMap<String, Accumulated> = HashMap::new();

    for (member_id, entries) in member_lists {
        // In-list playcount ceiling used by the weighted mode. A list where
        // every playcount is zero carries no weighting signal.
        let top_playcount = entries.iter().map(|entry| entry.playcount).max().unwrap_or(0);

        for entry in entries {
            let contributed = match mode {
                ChartMode::Vs => entry.score,
                ChartMode::VsWeighted => {
                    let weight = if top_playcount > 0 {
                        (1.0 + entry.playcount as f64 / top_playcount as f64) / 2.0
                    } else {
                        1.0
                    };
                    entry.score * weight
                }
                ChartMode::PlaysOnly => entry.playcount as f64,
            };

            let accumulated =
                grouped
                    .entry(entry.entry_key.clone())
                    .or_insert_with(|| Accumulated {
                        name: entry.name.clone(),
                        artist: entry.artist.clone(),
                        value: 0.0,
                        playcount: 0,
                        contributors: Vec::new(),
                        display_playcount: entry.playcount,
                        display_member_id: *member_id,
                    });

            accumulated.value += contributed;
            accumulated.playcount += entry.playcount;
            accumulated.contributors.push(Contributor {
                member_id: *member_id,
                score: entry.score,
                playcount: entry.playcount,
            });

            // The heaviest listener's spelling wins; ties go to the lowest
            // member id so reruns render identically.
            if entry.playcount > accumulated.display_playcount
                || (entry.playcount == accumulated.display_playcount
                    && *member_id < accumulated.display_member_id)
            {
                accumulated.name = entry.name.clone();
                accumulated.artist = entry.artist.clone();
                accumulated.display_playcount = entry.playcount;
                accumulated.display_member_id = *member_id;
            }
        }
    }

    let mut ranked: Vec<(String, Accumulated)> = grouped.into_iter().collect();
    ranked.sort_by(|(key_a, a), (key_b, b)| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| b.playcount.cmp(&a.playcount))
            .then_with(|| key_a.cmp(key_b))
    });

    let size = usize::try_from(chart_size).unwrap_or(0);
    ranked.truncate(size);

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, (entry_key, mut accumulated))| {
            accumulated.contributors.sort_by(|a, b| {
                b.score
                    .total_cmp(&a.score)
                    .then_with(|| a.member_id.cmp(&b.member_id))
            });

            AggregatedEntry {
                position: index as i32 + 1,
                entry_key,
                name: accumulated.name,
                artist: accumulated.artist,
                score: accumulated.value,
                playcount: accumulated.playcount,
                contributors: accumulated.contributors,
            }
        })
        .collect()
}
