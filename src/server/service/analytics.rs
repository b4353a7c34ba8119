//! Cached per-entry analytics derived from persisted member scores.
//!
//! Computing an entry's cross-history totals means scanning every member's
//! score rows for that entry, so results are cached once computed. A
//! generation run rewrites the weeks behind those totals and batch-invalidates
//! the touched entries during finalization.

use std::collections::HashMap;
use std::sync::Arc;

use entity::types::ChartCategory;
use sea_orm::ConnectionTrait;
use tokio::sync::RwLock;

use crate::server::data::score::ScoreRepository;
use crate::server::error::Error;

/// Summed cross-history analytics for one chart entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryAnalytics {
    /// Score summed over every member and stored week
    pub total_score: f64,
    /// Plays summed over every member and stored week
    pub total_playcount: i64,
    /// Member with the highest summed score for the entry
    pub major_driver_member_id: Option<i32>,
}

/// Shared cache of per-entry analytics, keyed by group, category, and entry key
#[derive(Clone, Default)]
pub struct EntryAnalyticsCache {
    entries: Arc<RwLock<HashMap<(i32, ChartCategory, String), EntryAnalytics>>>,
}

impl EntryAnalyticsCache {
    /// Creates a new instance of [`EntryAnalyticsCache`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets an entry's analytics, computing them from stored scores on a miss
    ///
    /// `member_ids` is the group's current membership; rows of members no
    /// longer in the group do not count toward the totals.
    pub async fn get_or_compute<C: ConnectionTrait>(
        &self,
        db: &C,
        group_id: i32,
        member_ids: &[i32],
        category: ChartCategory,
        entry_key: &str,
    ) -> Result<EntryAnalytics, Error> {
        let cache_key = (group_id, category, entry_key.to_string());

        if let Some(hit) = self.entries.read().await.get(&cache_key) {
            return Ok(hit.clone());
        }

        let scores = ScoreRepository::new(db)
            .get_by_members_for_entry(member_ids, category, entry_key)
            .await?;

        let mut total_score = 0.0;
        let mut total_playcount = 0;
        let mut by_member: HashMap<i32, f64> = HashMap::new();
        for score in &scores {
            total_score += score.score;
            total_playcount += score.playcount;
            *by_member.entry(score.member_id).or_insert(0.0) += score.score;
        }

        let major_driver_member_id = by_member
            .into_iter()
            .max_by(|(member_a, score_a), (member_b, score_b)| {
                score_a
                    .total_cmp(score_b)
                    .then_with(|| member_b.cmp(member_a))
            })
            .map(|(member_id, _)| member_id);

        let analytics = EntryAnalytics {
            total_score,
            total_playcount,
            major_driver_member_id,
        };
        self.entries
            .write()
            .await
            .insert(cache_key, analytics.clone());

        Ok(analytics)
    }

    /// Drops the cached analytics for every listed entry of a group
    pub async fn invalidate_many(&self, group_id: i32, entry_keys: &[(ChartCategory, String)]) {
        let mut entries = self.entries.write().await;
        for (category, entry_key) in entry_keys {
            entries.remove(&(group_id, *category, entry_key.clone()));
        }
    }
}
