//! Per-member contribution totals, applied weekly and rebuildable by replay.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDateTime, Utc};
use entity::types::ChartCategory;
use sea_orm::ConnectionTrait;

use crate::server::{
    data::{
        chart::ChartRepository,
        contribution::{ContributionDelta, ContributionRepository},
        member::MemberRepository,
        score::ScoreRepository,
    },
    error::Error,
    service::aggregation::{AggregatedEntry, Contributor},
};

/// Service maintaining each member's cumulative share of the group's charts
pub struct ContributionService<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ContributionService<'a, C> {
    /// Creates a new instance of [`ContributionService`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Folds one finalized week into the members' stored totals
    ///
    /// Runs inside the transaction persisting the week. `debuts` is the set of
    /// entries that charted for the first time this week, credited to every member
    /// who contributed to them.
    pub async fn apply_week(
        &self,
        group_id: i32,
        categories: &[(ChartCategory, Vec<AggregatedEntry>)],
        debuts: &HashSet<(ChartCategory, String)>,
        now: NaiveDateTime,
    ) -> Result<(), Error> {
        let mut deltas: Vec<(i32, ContributionDelta)> =
            week_deltas(categories, debuts).into_iter().collect();
        deltas.sort_unstable_by_key(|(member_id, _)| *member_id);

        let contribution_repo = ContributionRepository::new(self.db);
        for (member_id, delta) in &deltas {
            contribution_repo
                .apply_delta(group_id, *member_id, delta, now)
                .await?;
        }

        Ok(())
    }

    /// Rebuilds every member's totals by replaying the group's stored charts
    ///
    /// Contributors are reconstructed from the members' persisted score rows, so
    /// rows of members who since left the group no longer count. Weeks are
    /// replayed oldest-first to reproduce debut credit.
    pub async fn rebuild(&self, group_id: i32) -> Result<(), Error> {
        let members = MemberRepository::new(self.db)
            .get_all_by_group_id(group_id)
            .await?;
        let member_ids: Vec<i32> = members.iter().map(|member| member.id).collect();

        let chart_repo = ChartRepository::new(self.db);
        let score_repo = ScoreRepository::new(self.db);
        let charts = chart_repo.get_all_by_group(group_id).await?;

        let mut seen: HashSet<(ChartCategory, String)> = HashSet::new();
        let mut totals: HashMap<i32, ContributionDelta> = HashMap::new();

        for chart in &charts {
            let entries = chart_repo.get_entries(chart.id).await?;
            let scores = score_repo
                .get_by_members_week(&member_ids, chart.week_start)
                .await?;

            let mut by_entry: HashMap<(ChartCategory, String), Vec<Contributor>> = HashMap::new();
            for score in scores {
                by_entry
                    .entry((score.category, score.entry_key))
                    .or_default()
                    .push(Contributor {
                        member_id: score.member_id,
                        score: score.score,
                        playcount: score.playcount,
                    });
            }

            let mut categories: Vec<(ChartCategory, Vec<AggregatedEntry>)> = Vec::new();
            for entry in entries {
                let category = entry.category;
                let mut contributors = by_entry
                    .remove(&(category, entry.entry_key.clone()))
                    .unwrap_or_default();
                contributors.sort_by(|a, b| b.score.total_cmp(&a.score));

                let aggregated = AggregatedEntry {
                    position: entry.position,
                    entry_key: entry.entry_key,
                    name: entry.name,
                    artist: entry.artist,
                    score: entry.score,
                    playcount: entry.playcount,
                    contributors,
                };
                match categories.last_mut() {
                    Some((last, list)) if *last == category => list.push(aggregated),
                    _ => categories.push((category, vec![aggregated])),
                }
            }

            let mut debuts = HashSet::new();
            for (category, entries) in &categories {
                for entry in entries {
                    let key = (*category, entry.entry_key.clone());
                    if seen.insert(key.clone()) {
                        debuts.insert(key);
                    }
                }
            }

            for (member_id, delta) in week_deltas(&categories, &debuts) {
                add_delta(totals.entry(member_id).or_default(), &delta);
            }
        }

        let mut rows: Vec<(i32, ContributionDelta)> = totals.into_iter().collect();
        rows.sort_unstable_by_key(|(member_id, _)| *member_id);

        let now = Utc::now().naive_utc();
        ContributionRepository::new(self.db)
            .replace_all(group_id, &rows, now)
            .await?;

        tracing::debug!(
            "Rebuilt contribution totals for {} member(s) of group {} from {} chart(s)",
            rows.len(),
            group_id,
            charts.len()
        );

        Ok(())
    }
}

/// Computes each contributing member's delta for one week's charts.
///
/// Exactly one member per week is credited as MVP, the one with the highest
/// score summed across all categories; the lower member ID wins a tie.
fn week_deltas(
    categories: &[(ChartCategory, Vec<AggregatedEntry>)],
    debuts: &HashSet<(ChartCategory, String)>,
) -> HashMap<i32, ContributionDelta> {
    let mut deltas: HashMap<i32, ContributionDelta> = HashMap::new();

    for (category, entries) in categories {
        for entry in entries {
            let debut = debuts.contains(&(*category, entry.entry_key.clone()));
            let at_top = entry.position == 1;

            for contributor in &entry.contributors {
                let delta = deltas.entry(contributor.member_id).or_default();
                delta.score += contributor.score;
                delta.playcount += contributor.playcount;

                if debut {
                    match category {
                        ChartCategory::Artist => delta.artist_debuts += 1,
                        ChartCategory::Track => delta.track_debuts += 1,
                        ChartCategory::Album => delta.album_debuts += 1,
                    }
                }
                if at_top {
                    match category {
                        ChartCategory::Artist => delta.artist_number_ones += 1,
                        ChartCategory::Track => delta.track_number_ones += 1,
                        ChartCategory::Album => delta.album_number_ones += 1,
                    }
                }
            }
        }
    }

    let mvp = deltas
        .iter()
        .max_by(|(member_a, delta_a), (member_b, delta_b)| {
            delta_a
                .score
                .total_cmp(&delta_b.score)
                .then_with(|| member_b.cmp(member_a))
        })
        .map(|(member_id, _)| *member_id);
    if let Some(member_id) = mvp {
        if let Some(delta) = deltas.get_mut(&member_id) {
            delta.mvp_weeks = 1;
        }
    }

    deltas
}

/// Adds one week's delta onto a running total.
fn add_delta(total: &mut ContributionDelta, delta: &ContributionDelta) {
    total.score += delta.score;
    total.playcount += delta.playcount;
    total.artist_debuts += delta.artist_debuts;
    total.track_debuts += delta.track_debuts;
    total.album_debuts += delta.album_debuts;
    total.artist_number_ones += delta.artist_number_ones;
    total.track_number_ones += delta.track_number_ones;
    total.album_number_ones += delta.album_number_ones;
    total.mvp_weeks += delta.mvp_weeks;
}
