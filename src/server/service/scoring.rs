//! Per-member scoring of weekly top lists.
//!
//! Scores depend only on an item's rank within the member's own list, never on
//! absolute playcounts. A member with 50 plays a week and a member with 5,000
//! produce scores on the same scale, which is what makes summing across
//! members fair.

use entity::types::ChartCategory;

use crate::server::scrobble::model::TopListItem;
use crate::server::util::entry::entry_key;

/// Tunable decay curve for converting ranks into scores.
///
/// The exact curve is policy; the contracts callers rely on are that scores
/// never increase as rank deepens, stay within `0.0..=max_score`, and are
/// deterministic for a given input ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringPolicy {
    /// Score awarded at rank 1
    pub max_score: f64,
    /// Number of ranks over which the score halves
    pub half_life_ranks: f64,
}

impl ScoringPolicy {
    /// Deepest rank that still receives a score. Items ranked beyond this are
    /// dropped entirely and never persisted.
    pub const MAX_SCORED_RANK: i32 = 100;

    /// Creates a new instance of [`ScoringPolicy`]
    pub fn new(max_score: f64, half_life_ranks: f64) -> Self {
        Self {
            max_score,
            half_life_ranks,
        }
    }

    /// Score for a 1-based rank within a member's own list
    ///
    /// Rank 1 scores `max_score`; every `half_life_ranks` deeper halves the
    /// score. Ranks outside `1..=MAX_SCORED_RANK` score zero.
    pub fn score_for_rank(&self, rank: i32) -> f64 {
        if rank < 1 || rank > Self::MAX_SCORED_RANK {
            return 0.0;
        }

        self.max_score * 0.5_f64.powf(f64::from(rank - 1) / self.half_life_ranks)
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            max_score: 100.0,
            half_life_ranks: 20.0,
        }
    }
}

/// One scored row from a member's weekly top list
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntry {
    /// Normalized entry key used for cross-member grouping
    pub entry_key: String,
    /// Display name as reported by the scrobble service
    pub name: String,
    /// Credited artist for tracks and albums
    pub artist: Option<String>,
    /// 1-based rank within the member's own list
    pub rank: i32,
    /// Raw plays behind the rank
    pub playcount: i64,
    /// Rank-derived score
    pub score: f64,
}

/// Scores one member's ranked top list for one category
///
/// Items ranked beyond [`ScoringPolicy::MAX_SCORED_RANK`] or carrying an
/// invalid rank are dropped.
pub fn score_top_list(
    policy: &ScoringPolicy,
    category: ChartCategory,
    items: &[TopListItem],
) -> Vec<ScoredEntry> {
    items
        .iter()
        .filter(|item| item.rank >= 1 && item.rank <= ScoringPolicy::MAX_SCORED_RANK)
        .map(|item| ScoredEntry {
            entry_key: entry_key(category, &item.name, item.artist.as_deref()),
            name: item.name.clone(),
            artist: item.artist.clone(),
            rank: item.rank,
            playcount: item.playcount,
            score: policy.score_for_rank(item.rank),
        })
        .collect()
}
