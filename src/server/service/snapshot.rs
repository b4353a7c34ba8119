//! Cache-or-fetch access to member weekly snapshots.
//!
//! A member's week is fetched from the scrobble service at most once. Stored
//! snapshots are rescored from their play rows on every read so persisted
//! scores always reflect the current scoring curve, and freshly fetched weeks
//! are persisted with their scores in one transaction before being returned.

use chrono::Utc;
use entity::types::ChartCategory;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::server::data::score::{NewScore, ScoreRepository};
use crate::server::data::snapshot::SnapshotRepository;
use crate::server::error::{chart::ChartError, Error};
use crate::server::scrobble::model::TopListItem;
use crate::server::scrobble::ScrobbleClient;
use crate::server::service::retry::{RetryContext, RetryPolicy};
use crate::server::service::scoring::{score_top_list, ScoredEntry, ScoringPolicy};
use crate::server::util::week::WeekRange;

/// Per-category top lists fetched for one member week.
///
/// Lives inside a retry context so categories already fetched by a failed
/// attempt are not fetched again by the next one.
#[derive(Clone, Default, Debug)]
pub struct WeeklyFetchCache {
    /// Weekly artist chart, once fetched
    pub artists: Option<Vec<TopListItem>>,
    /// Weekly track chart, once fetched
    pub tracks: Option<Vec<TopListItem>>,
    /// Weekly album chart, once fetched
    pub albums: Option<Vec<TopListItem>>,
}

/// One member's scored lists for one week, ready for aggregation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredSnapshot {
    /// Scored artist list
    pub artists: Vec<ScoredEntry>,
    /// Scored track list
    pub tracks: Vec<ScoredEntry>,
    /// Scored album list
    pub albums: Vec<ScoredEntry>,
}

impl ScoredSnapshot {
    /// Scored list for one category
    pub fn for_category(&self, category: ChartCategory) -> &[ScoredEntry] {
        match category {
            ChartCategory::Artist => &self.artists,
            ChartCategory::Track => &self.tracks,
            ChartCategory::Album => &self.albums,
        }
    }
}

/// Service providing cache-or-fetch access to member week snapshots
pub struct SnapshotService<'a> {
    db: &'a DatabaseConnection,
    scrobble_client: &'a ScrobbleClient,
}

impl<'a> SnapshotService<'a> {
    /// Creates a new instance of [`SnapshotService`]
    pub fn new(db: &'a DatabaseConnection, scrobble_client: &'a ScrobbleClient) -> Self {
        Self {
            db,
            scrobble_client,
        }
    }

    /// Gets a member's scored week, fetching and persisting it on a cache miss
    ///
    /// Fetches retry per the policy; a week that still cannot be collected is
    /// surfaced as [`ChartError::MemberFetchFailed`] so the run orchestrator
    /// can do per-member failure accounting.
    pub async fn get_or_fetch(
        &self,
        member: &entity::chorus_member::Model,
        week: WeekRange,
        scoring: &ScoringPolicy,
        retry_policy: RetryPolicy,
    ) -> Result<ScoredSnapshot, Error> {
        let snapshot_repo = SnapshotRepository::new(self.db);

        let existing = snapshot_repo
            .find_by_member_week(member.id, week.start)
            .await?;
        if let Some(snapshot) = existing {
            return self
                .score_stored_snapshot(member, week, snapshot.id, scoring)
                .await;
        }

        self.fetch_and_persist(member, week, scoring, retry_policy)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to collect week starting {} for {}: {:?}",
                    week.start,
                    member.username,
                    e
                );
                Error::ChartError(ChartError::MemberFetchFailed {
                    username: member.username.clone(),
                })
            })
    }

    /// Rescores a stored snapshot from its play rows and refreshes the
    /// persisted scores to match.
    async fn score_stored_snapshot(
        &self,
        member: &entity::chorus_member::Model,
        week: WeekRange,
        snapshot_id: i32,
        scoring: &ScoringPolicy,
    ) -> Result<ScoredSnapshot, Error> {
        let snapshot_repo = SnapshotRepository::new(self.db);

        let artists = plays_to_items(
            snapshot_repo
                .get_plays(snapshot_id, ChartCategory::Artist)
                .await?,
        );
        let tracks = plays_to_items(
            snapshot_repo
                .get_plays(snapshot_id, ChartCategory::Track)
                .await?,
        );
        let albums = plays_to_items(
            snapshot_repo
                .get_plays(snapshot_id, ChartCategory::Album)
                .await?,
        );

        let scored = ScoredSnapshot {
            artists: score_top_list(scoring, ChartCategory::Artist, &artists),
            tracks: score_top_list(scoring, ChartCategory::Track, &tracks),
            albums: score_top_list(scoring, ChartCategory::Album, &albums),
        };

        persist_scores(self.db, member.id, week, &scored).await?;

        Ok(scored)
    }

    /// Fetches all three categories, persists the snapshot with its scores in
    /// one transaction, and returns the scored lists.
    async fn fetch_and_persist(
        &self,
        member: &entity::chorus_member::Model,
        week: WeekRange,
        scoring: &ScoringPolicy,
        retry_policy: RetryPolicy,
    ) -> Result<ScoredSnapshot, Error> {
        let mut retry: RetryContext<WeeklyFetchCache> = RetryContext::with_policy(retry_policy);

        let db = self.db.clone();
        let client = self.scrobble_client.clone();
        let member = member.clone();
        let scoring = scoring.clone();
        let description = format!("weekly charts for {}", member.username);

        retry
            .execute_with_retry(&description, move |cache| {
                let db = db.clone();
                let client = client.clone();
                let member = member.clone();
                let scoring = scoring.clone();

                Box::pin(async move {
                    if cache.artists.is_none() {
                        cache.artists = Some(
                            client
                                .weekly_artist_chart(
                                    &member.username,
                                    member.session_key.as_deref(),
                                    week.start_ts(),
                                    week.end_ts(),
                                )
                                .await?,
                        );
                    }
                    if cache.tracks.is_none() {
                        cache.tracks = Some(
                            client
                                .weekly_track_chart(
                                    &member.username,
                                    member.session_key.as_deref(),
                                    week.start_ts(),
                                    week.end_ts(),
                                )
                                .await?,
                        );
                    }
                    if cache.albums.is_none() {
                        cache.albums = Some(
                            client
                                .weekly_album_chart(
                                    &member.username,
                                    member.session_key.as_deref(),
                                    week.start_ts(),
                                    week.end_ts(),
                                )
                                .await?,
                        );
                    }

                    let artists = cache.artists.clone().unwrap_or_default();
                    let tracks = cache.tracks.clone().unwrap_or_default();
                    let albums = cache.albums.clone().unwrap_or_default();

                    let scored = ScoredSnapshot {
                        artists: score_top_list(&scoring, ChartCategory::Artist, &artists),
                        tracks: score_top_list(&scoring, ChartCategory::Track, &tracks),
                        albums: score_top_list(&scoring, ChartCategory::Album, &albums),
                    };

                    let txn = db.begin().await?;

                    let snapshot_repo = SnapshotRepository::new(&txn);
                    let snapshot = snapshot_repo
                        .create(member.id, week.start, Utc::now().naive_utc())
                        .await?;
                    snapshot_repo
                        .insert_plays(snapshot.id, ChartCategory::Artist, &artists)
                        .await?;
                    snapshot_repo
                        .insert_plays(snapshot.id, ChartCategory::Track, &tracks)
                        .await?;
                    snapshot_repo
                        .insert_plays(snapshot.id, ChartCategory::Album, &albums)
                        .await?;
                    persist_scores(&txn, member.id, week, &scored).await?;

                    txn.commit().await?;

                    Ok(scored)
                })
            })
            .await
    }
}

/// Replaces a member's persisted scores for one week with the given lists
async fn persist_scores<C: ConnectionTrait>(
    db: &C,
    member_id: i32,
    week: WeekRange,
    scored: &ScoredSnapshot,
) -> Result<(), Error> {
    let mut rows =
        Vec::with_capacity(scored.artists.len() + scored.tracks.len() + scored.albums.len());
    for (category, entries) in [
        (ChartCategory::Artist, &scored.artists),
        (ChartCategory::Track, &scored.tracks),
        (ChartCategory::Album, &scored.albums),
    ] {
        rows.extend(entries.iter().map(|entry| NewScore {
            category,
            entry_key: entry.entry_key.clone(),
            score: entry.score,
            playcount: entry.playcount,
        }));
    }

    ScoreRepository::new(db)
        .replace_for_member_week(member_id, week.start, &rows)
        .await?;

    Ok(())
}

fn plays_to_items(plays: Vec<entity::member_week_play::Model>) -> Vec<TopListItem> {
    plays
        .into_iter()
        .map(|play| TopListItem {
            rank: play.rank,
            name: play.name,
            artist: play.artist,
            playcount: play.playcount,
        })
        .collect()
}
