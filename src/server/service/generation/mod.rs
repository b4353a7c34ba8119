//! Chart generation run orchestration.
//!
//! This module owns the lifecycle of a generation run: acquiring the group's
//! generation lease, working out which finished weeks still need charts, collecting
//! and scoring every member's listening data per week, aggregating and persisting the
//! weekly charts together with their incremental statistics, and finalizing with the
//! derived data that only depends on the finished run.
//!
//! Weeks are processed strictly oldest-first so incremental statistics (streaks,
//! debuts) observe appearances in order. Within one week, member fetches run
//! concurrently; the scrobble client's rate limiter is the only shared resource they
//! contend on. A member whose data cannot be collected is skipped for the remainder
//! of the run, and the run aborts once too many members have failed.
//!
//! The lease is a token plus expiry rather than a plain flag. Every exit path
//! releases it, and an expired lease can be reclaimed by the scheduler watchdog or
//! overturned by the next acquisition, so a crashed run never locks a group out.

mod config;

pub use config::PipelinePolicy;

use std::collections::{BTreeSet, HashSet};

use chrono::{Duration, NaiveDateTime, Utc};
use entity::types::{ChartCategory, ChartMode, GenerationStage};
use futures::stream::{FuturesUnordered, StreamExt};
use rand::Rng;
use sea_orm::{ActiveEnum, DatabaseConnection, TransactionTrait};

use crate::{
    model::api::{GenerateChartsDto, GenerationStatusDto},
    server::{
        data::{
            chart::{ChartRepository, NewChartEntry},
            generation::GenerationStateRepository,
            group::GroupRepository,
            member::MemberRepository,
        },
        error::{chart::ChartError, Error},
        model::task::TaskJob,
        scrobble::ScrobbleClient,
        service::{
            aggregation::{aggregate_category, AggregatedEntry},
            analytics::EntryAnalyticsCache,
            scoring::ScoredEntry,
            snapshot::{ScoredSnapshot, SnapshotService},
            stats::{
                alltime::AlltimeService, contribution::ContributionService,
                entry_history::EntryHistoryService, movement::MovementService,
            },
        },
        util::week::{tracking_weekday, weeks_to_generate, WeekRange},
        worker::queue::TaskQueue,
    },
};

/// Service starting and observing chart generation runs for a group
pub struct GenerationService<'a> {
    db: &'a DatabaseConnection,
    scrobble_client: &'a ScrobbleClient,
    analytics: &'a EntryAnalyticsCache,
    tasks: &'a TaskQueue,
    policy: &'a PipelinePolicy,
}

impl<'a> GenerationService<'a> {
    /// Creates a new instance of [`GenerationService`]
    pub fn new(
        db: &'a DatabaseConnection,
        scrobble_client: &'a ScrobbleClient,
        analytics: &'a EntryAnalyticsCache,
        tasks: &'a TaskQueue,
        policy: &'a PipelinePolicy,
    ) -> Self {
        Self {
            db,
            scrobble_client,
            analytics,
            tasks,
            policy,
        }
    }

    /// Starts a generation run for a group after applying any provided settings
    ///
    /// Settings are validated and stored on the group before the run begins, so the
    /// run and every later read see the same mode, size, and tracking day. The run
    /// itself executes on a spawned task; this method returns as soon as the group's
    /// generation lease has been acquired.
    ///
    /// # Returns
    /// - `Ok(GenerationStatusDto)` - The freshly started run's status
    /// - `Err(Error::ChartError(ChartError::GroupNotFound))` - Unknown group ID
    /// - `Err(Error::ChartError(ChartError::InvalidChartMode | InvalidChartSize | InvalidTrackingDay))` - Rejected settings
    /// - `Err(Error::ChartError(ChartError::GenerationInProgress))` - Another run holds a live lease
    pub async fn start(
        &self,
        group_id: i32,
        settings: &GenerateChartsDto,
    ) -> Result<GenerationStatusDto, Error> {
        let group = self.apply_settings(group_id, settings).await?;

        let state_repo = GenerationStateRepository::new(self.db);
        let now = Utc::now().naive_utc();

        state_repo.get_or_create(group_id, now).await?;

        let owner_token = generate_owner_token();
        let expires_at = lease_expiry(now, self.policy.lease_seconds)?;

        let acquired = state_repo
            .try_acquire(group_id, &owner_token, expires_at, now)
            .await?;
        if !acquired {
            return Err(Error::ChartError(ChartError::GenerationInProgress(
                group_id,
            )));
        }

        let run = GenerationRun {
            db: self.db.clone(),
            scrobble_client: self.scrobble_client.clone(),
            analytics: self.analytics.clone(),
            tasks: self.tasks.clone(),
            policy: self.policy.clone(),
            group,
            owner_token,
        };

        tokio::spawn(run.execute());

        self.status(group_id).await
    }

    /// Gets the current generation status of a group
    ///
    /// A group that never generated reports an idle status rather than an error.
    /// An expired lease is reclaimed on read, so a crashed runner shows up as an
    /// aborted run instead of one stuck in progress.
    pub async fn status(&self, group_id: i32) -> Result<GenerationStatusDto, Error> {
        let group_repo = GroupRepository::new(self.db);
        if group_repo.get(group_id).await?.is_none() {
            return Err(Error::ChartError(ChartError::GroupNotFound(group_id)));
        }

        let state_repo = GenerationStateRepository::new(self.db);
        let mut state = state_repo.get(group_id).await?;

        if let Some(current) = &state {
            let now = Utc::now().naive_utc();
            let expired = current.in_progress
                && current.lease_expires_at.map_or(false, |expiry| expiry < now);

            if expired && state_repo.reclaim(group_id, now).await? {
                tracing::warn!(
                    "Reclaimed an expired generation lease for group {}",
                    group_id
                );
                state = state_repo.get(group_id).await?;
            }
        }

        Ok(status_from_state(group_id, state))
    }

    /// Validates the requested settings and stores them on the group
    ///
    /// Absent fields leave the stored settings untouched.
    async fn apply_settings(
        &self,
        group_id: i32,
        settings: &GenerateChartsDto,
    ) -> Result<entity::chorus_group::Model, Error> {
        let chart_mode = match &settings.chart_mode {
            Some(mode) => Some(ChartMode::try_from_value(mode).map_err(|_| {
                Error::ChartError(ChartError::InvalidChartMode(mode.clone()))
            })?),
            None => None,
        };
        if let Some(size) = settings.chart_size {
            if size < 1 {
                return Err(Error::ChartError(ChartError::InvalidChartSize(size)));
            }
        }
        if let Some(day) = settings.tracking_day {
            tracking_weekday(day)?;
        }

        let group_repo = GroupRepository::new(self.db);

        if chart_mode.is_none() && settings.chart_size.is_none() && settings.tracking_day.is_none()
        {
            return group_repo
                .get(group_id)
                .await?
                .ok_or(Error::ChartError(ChartError::GroupNotFound(group_id)));
        }

        group_repo
            .update_chart_settings(
                group_id,
                chart_mode,
                settings.chart_size,
                settings.tracking_day,
            )
            .await?
            .ok_or(Error::ChartError(ChartError::GroupNotFound(group_id)))
    }
}

/// One spawned generation run with owned copies of everything it needs.
struct GenerationRun {
    db: DatabaseConnection,
    scrobble_client: ScrobbleClient,
    analytics: EntryAnalyticsCache,
    tasks: TaskQueue,
    policy: PipelinePolicy,
    group: entity::chorus_group::Model,
    owner_token: String,
}

/// Mutable accounting carried across the weeks of one run.
struct RunState {
    /// Members skipped for the rest of the run after a failed fetch.
    failed_member_ids: HashSet<i32>,
    /// Usernames of the failed members, ordered for stable status reporting.
    failed_usernames: BTreeSet<String>,
    /// Entry keys written this run, invalidated in the analytics cache at the end.
    touched_entries: HashSet<(ChartCategory, String)>,
}

impl GenerationRun {
    /// Executes the run and releases the generation lease on every exit path
    async fn execute(self) {
        let group_id = self.group.id;

        tracing::info!("Starting chart generation run for group {}", group_id);

        let result = self.run().await;
        let aborted = result.is_err();

        let now = Utc::now().naive_utc();
        let state_repo = GenerationStateRepository::new(&self.db);
        match state_repo
            .release(group_id, &self.owner_token, aborted, now)
            .await
        {
            Ok(true) => {}
            Ok(false) => tracing::warn!(
                "Generation lease for group {} was already released by another process",
                group_id
            ),
            Err(e) => tracing::error!(
                "Failed to release generation lease for group {}: {:?}",
                group_id,
                e
            ),
        }

        match result {
            Ok(0) => {
                tracing::info!("Charts for group {} are already up to date", group_id);
            }
            Ok(weeks) => {
                tracing::info!("Generated {} chart week(s) for group {}", weeks, group_id);
                self.enqueue_follow_ups(group_id).await;
            }
            Err(e) => {
                tracing::error!("Chart generation run for group {} failed: {:?}", group_id, e);
            }
        }
    }

    /// Runs the generation pipeline, returning how many weeks were generated
    async fn run(&self) -> Result<usize, Error> {
        let group_id = self.group.id;
        let now = Utc::now();
        let weekday = tracking_weekday(self.group.tracking_day_of_week)?;

        let chart_repo = ChartRepository::new(&self.db);
        let last_stored = chart_repo
            .find_latest(group_id)
            .await?
            .map(|chart| chart.week_start);

        let weeks = weeks_to_generate(last_stored, now, weekday, self.policy.weeks_per_run)?;
        let total_weeks = i32::try_from(weeks.len()).unwrap_or(i32::MAX);

        let state_repo = GenerationStateRepository::new(&self.db);
        let begun = state_repo
            .begin_run(group_id, &self.owner_token, total_weeks, now.naive_utc())
            .await?;
        if !begun {
            return Err(Error::ChartError(ChartError::LeaseLost { group_id }));
        }

        if weeks.is_empty() {
            return Ok(0);
        }

        let members = MemberRepository::new(&self.db)
            .get_all_by_group_id(group_id)
            .await?;

        let mut run = RunState {
            failed_member_ids: HashSet::new(),
            failed_usernames: BTreeSet::new(),
            touched_entries: HashSet::new(),
        };

        for (index, week) in weeks.iter().enumerate() {
            self.process_week(*week, index, weeks.len(), &members, &mut run)
                .await?;

            if index + 1 < weeks.len() {
                tokio::time::sleep(self.policy.week_pause()).await;
            }
        }

        self.finalize(&run).await?;

        Ok(weeks.len())
    }

    /// Collects, aggregates, and persists a single chart week
    async fn process_week(
        &self,
        week: WeekRange,
        index: usize,
        total: usize,
        members: &[entity::chorus_member::Model],
        run: &mut RunState,
    ) -> Result<(), Error> {
        let group_id = self.group.id;
        let now = Utc::now().naive_utc();
        let state_repo = GenerationStateRepository::new(&self.db);

        // Hold the lease for at least the remainder of this week's work
        let expires_at = lease_expiry(now, self.policy.lease_seconds)?;
        let renewed = state_repo
            .renew_lease(group_id, &self.owner_token, expires_at, now)
            .await?;
        if !renewed {
            return Err(Error::ChartError(ChartError::LeaseLost { group_id }));
        }

        let week_number = i32::try_from(index + 1).unwrap_or(i32::MAX);
        state_repo
            .set_progress(group_id, &self.owner_token, week_number, now)
            .await?;
        state_repo
            .set_stage(group_id, &self.owner_token, GenerationStage::Fetching, now)
            .await?;

        tracing::info!(
            "Collecting week starting {} for group {} ({}/{})",
            week.start,
            group_id,
            week_number,
            total
        );

        let snapshots = self.collect_member_weeks(week, members, run).await?;

        if run.failed_member_ids.len() > self.policy.max_member_failures {
            return Err(Error::ChartError(ChartError::GenerationAborted {
                failed_count: run.failed_member_ids.len(),
            }));
        }

        let now = Utc::now().naive_utc();
        state_repo
            .set_stage(group_id, &self.owner_token, GenerationStage::Processing, now)
            .await?;

        let mut categories: Vec<(ChartCategory, Vec<AggregatedEntry>)> = Vec::new();
        for category in [
            ChartCategory::Artist,
            ChartCategory::Track,
            ChartCategory::Album,
        ] {
            let member_lists: Vec<(i32, Vec<ScoredEntry>)> = snapshots
                .iter()
                .map(|(member_id, snapshot)| (*member_id, snapshot.for_category(category).to_vec()))
                .collect();

            let entries =
                aggregate_category(&member_lists, self.group.chart_mode, self.group.chart_size);
            categories.push((category, entries));
        }

        self.persist_week(week, &categories, now).await?;

        for (category, entries) in &categories {
            for entry in entries {
                run.touched_entries
                    .insert((*category, entry.entry_key.clone()));
            }
        }

        Ok(())
    }

    /// Collects every active member's scored week concurrently
    ///
    /// Members already marked failed are skipped. A fetch that fails every retry adds
    /// the member to the run's failed set instead of stopping the week; any other
    /// error is fatal to the run.
    async fn collect_member_weeks(
        &self,
        week: WeekRange,
        members: &[entity::chorus_member::Model],
        run: &mut RunState,
    ) -> Result<Vec<(i32, ScoredSnapshot)>, Error> {
        let snapshot_service = SnapshotService::new(&self.db, &self.scrobble_client);

        let active: Vec<&entity::chorus_member::Model> = members
            .iter()
            .filter(|member| !run.failed_member_ids.contains(&member.id))
            .collect();

        let mut snapshots = Vec::with_capacity(active.len());
        let mut newly_failed = false;

        for chunk in active.chunks(self.policy.max_concurrent_fetches.max(1)) {
            let mut futures = FuturesUnordered::new();

            for &member in chunk {
                let service = &snapshot_service;
                let scoring = &self.policy.scoring;
                let retry = self.policy.retry;

                let future = async move {
                    let result = service.get_or_fetch(member, week, scoring, retry).await;
                    (member, result)
                };
                futures.push(future);
            }

            while let Some((member, result)) = futures.next().await {
                match result {
                    Ok(snapshot) => snapshots.push((member.id, snapshot)),
                    Err(Error::ChartError(ChartError::MemberFetchFailed { username })) => {
                        tracing::warn!(
                            "Skipping member {} for the rest of the run for group {}",
                            username,
                            self.group.id
                        );
                        run.failed_member_ids.insert(member.id);
                        run.failed_usernames.insert(username);
                        newly_failed = true;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        if newly_failed {
            let failed: Vec<String> = run.failed_usernames.iter().cloned().collect();
            let now = Utc::now().naive_utc();

            GenerationStateRepository::new(&self.db)
                .set_failed_members(self.group.id, &self.owner_token, &failed, now)
                .await?;
        }

        Ok(snapshots)
    }

    /// Persists one week's charts and incremental statistics in a single transaction
    ///
    /// Any stored chart overlapping the new week is deleted first, so regenerating
    /// after a tracking day change replaces stale boundaries instead of stacking
    /// conflicting weeks.
    async fn persist_week(
        &self,
        week: WeekRange,
        categories: &[(ChartCategory, Vec<AggregatedEntry>)],
        now: NaiveDateTime,
    ) -> Result<(), Error> {
        let group_id = self.group.id;

        let entries: Vec<NewChartEntry> = categories
            .iter()
            .flat_map(|(category, entries)| {
                entries.iter().map(|entry| NewChartEntry {
                    category: *category,
                    position: entry.position,
                    entry_key: entry.entry_key.clone(),
                    name: entry.name.clone(),
                    artist: entry.artist.clone(),
                    playcount: entry.playcount,
                    score: entry.score,
                    movement: None,
                })
            })
            .collect();

        let txn = self.db.begin().await?;

        let chart_repo = ChartRepository::new(&txn);

        let replaced = chart_repo
            .delete_overlapping(group_id, week.start, week.end)
            .await?;
        if replaced > 0 {
            tracing::info!(
                "Replaced {} overlapping chart(s) for group {} at week starting {}",
                replaced,
                group_id,
                week.start
            );
        }

        let chart = chart_repo
            .create(group_id, week.start, week.end, now)
            .await?;
        chart_repo.insert_entries(chart.id, &entries).await?;

        let debuts = EntryHistoryService::new(&txn)
            .record_week(group_id, week.start, categories, now)
            .await?;
        ContributionService::new(&txn)
            .apply_week(group_id, categories, &debuts, now)
            .await?;

        txn.commit().await?;

        Ok(())
    }

    /// Finalizes a successful run with the statistics derived from the whole run
    async fn finalize(&self, run: &RunState) -> Result<(), Error> {
        let group_id = self.group.id;
        let now = Utc::now().naive_utc();

        GenerationStateRepository::new(&self.db)
            .set_stage(group_id, &self.owner_token, GenerationStage::Finalizing, now)
            .await?;

        AlltimeService::new(&self.db).rebuild(group_id).await?;
        MovementService::new(&self.db)
            .recompute_latest(group_id)
            .await?;

        let touched: Vec<(ChartCategory, String)> =
            run.touched_entries.iter().cloned().collect();
        self.analytics.invalidate_many(group_id, &touched).await;

        Ok(())
    }

    /// Enqueues the deferred statistics work that runs after the lease is released
    async fn enqueue_follow_ups(&self, group_id: i32) {
        for job in [
            TaskJob::RecalculateRecords { group_id },
            TaskJob::RefreshGroupIcon { group_id },
        ] {
            if let Err(e) = self.tasks.push(job).await {
                tracing::warn!("Dropped follow-up task for group {}: {:?}", group_id, e);
            }
        }
    }
}

/// Generates the random token identifying one run as the lease owner.
fn generate_owner_token() -> String {
    format!("{:016x}", rand::rng().random::<u64>())
}

/// Computes when a lease taken or renewed at `now` expires.
fn lease_expiry(now: NaiveDateTime, lease_seconds: i64) -> Result<NaiveDateTime, Error> {
    now.checked_add_signed(Duration::seconds(lease_seconds))
        .ok_or_else(|| {
            Error::ParseError("Failed to calculate the generation lease expiry".to_string())
        })
}

/// Maps a stored generation state row onto the status DTO.
///
/// A group without a state row reports idle.
fn status_from_state(
    group_id: i32,
    state: Option<entity::group_generation_state::Model>,
) -> GenerationStatusDto {
    match state {
        Some(state) => GenerationStatusDto {
            group_id,
            in_progress: state.in_progress,
            stage: state.stage.map(|stage| stage.to_value()),
            current_week: state.current_week,
            total_weeks: state.total_weeks,
            failed_members: serde_json::from_value(state.failed_members).unwrap_or_default(),
            last_run_aborted: state.last_run_aborted,
            started_at: state.started_at,
        },
        None => GenerationStatusDto {
            group_id,
            in_progress: false,
            stage: None,
            current_week: 0,
            total_weeks: 0,
            failed_members: Vec::new(),
            last_run_aborted: false,
            started_at: None,
        },
    }
}

#[cfg(test)]
mod tests {

    mod start {
        use chorus_test_utils::prelude::*;
        use chrono::{Duration, Utc};

        use crate::model::api::GenerateChartsDto;
        use crate::server::data::generation::GenerationStateRepository;
        use crate::server::error::{chart::ChartError, Error};
        use crate::server::scrobble::limiter::{RateLimitConfig, RateLimiter};
        use crate::server::scrobble::{ScrobbleClient, ScrobbleConfig};
        use crate::server::service::analytics::EntryAnalyticsCache;
        use crate::server::service::generation::{GenerationService, PipelinePolicy};
        use crate::server::worker::queue::TaskQueue;

        fn test_client(base_url: String) -> ScrobbleClient {
            ScrobbleClient::new(
                ScrobbleConfig {
                    base_url,
                    api_key: "test-api-key".to_string(),
                    user_agent: "chorus-test".to_string(),
                    request_timeout_secs: 5,
                },
                RateLimiter::new(RateLimitConfig::new(100.0, 100.0)),
            )
            .unwrap()
        }

        fn no_settings() -> GenerateChartsDto {
            GenerateChartsDto {
                chart_mode: None,
                chart_size: None,
                tracking_day: None,
            }
        }

        /// Expect an unknown group to be rejected before any lease is taken
        #[tokio::test]
        async fn rejects_unknown_group() -> Result<(), TestError> {
            let test = test_setup_with_chart_tables!()?;
            let client = test_client(test.server.url());
            let analytics = EntryAnalyticsCache::new();
            let tasks = TaskQueue::new();
            let policy = PipelinePolicy::default();

            let service =
                GenerationService::new(&test.state.db, &client, &analytics, &tasks, &policy);
            let result = service.start(99, &no_settings()).await;

            assert!(matches!(
                result,
                Err(Error::ChartError(ChartError::GroupNotFound(99)))
            ));

            Ok(())
        }

        /// Expect an unsupported chart mode to be rejected
        #[tokio::test]
        async fn rejects_invalid_chart_mode() -> Result<(), TestError> {
            let mut test = test_setup_with_chart_tables!()?;
            let group_model = test.group().insert_group("indieheads", 0).await?;
            let client = test_client(test.server.url());
            let analytics = EntryAnalyticsCache::new();
            let tasks = TaskQueue::new();
            let policy = PipelinePolicy::default();

            let service =
                GenerationService::new(&test.state.db, &client, &analytics, &tasks, &policy);
            let settings = GenerateChartsDto {
                chart_mode: Some("loudness_war".to_string()),
                chart_size: None,
                tracking_day: None,
            };
            let result = service.start(group_model.id, &settings).await;

            assert!(matches!(
                result,
                Err(Error::ChartError(ChartError::InvalidChartMode(_)))
            ));

            Ok(())
        }

        /// Expect a non-positive chart size to be rejected
        #[tokio::test]
        async fn rejects_invalid_chart_size() -> Result<(), TestError> {
            let mut test = test_setup_with_chart_tables!()?;
            let group_model = test.group().insert_group("indieheads", 0).await?;
            let client = test_client(test.server.url());
            let analytics = EntryAnalyticsCache::new();
            let tasks = TaskQueue::new();
            let policy = PipelinePolicy::default();

            let service =
                GenerationService::new(&test.state.db, &client, &analytics, &tasks, &policy);
            let settings = GenerateChartsDto {
                chart_mode: None,
                chart_size: Some(0),
                tracking_day: None,
            };
            let result = service.start(group_model.id, &settings).await;

            assert!(matches!(
                result,
                Err(Error::ChartError(ChartError::InvalidChartSize(0)))
            ));

            Ok(())
        }

        /// Expect an out-of-range tracking day to be rejected
        #[tokio::test]
        async fn rejects_invalid_tracking_day() -> Result<(), TestError> {
            let mut test = test_setup_with_chart_tables!()?;
            let group_model = test.group().insert_group("indieheads", 0).await?;
            let client = test_client(test.server.url());
            let analytics = EntryAnalyticsCache::new();
            let tasks = TaskQueue::new();
            let policy = PipelinePolicy::default();

            let service =
                GenerationService::new(&test.state.db, &client, &analytics, &tasks, &policy);
            let settings = GenerateChartsDto {
                chart_mode: None,
                chart_size: None,
                tracking_day: Some(7),
            };
            let result = service.start(group_model.id, &settings).await;

            assert!(matches!(
                result,
                Err(Error::ChartError(ChartError::InvalidTrackingDay(7)))
            ));

            Ok(())
        }

        /// Expect a second start to conflict while another run holds a live lease
        #[tokio::test]
        async fn conflicts_while_lease_is_held() -> Result<(), TestError> {
            let mut test = test_setup_with_chart_tables!()?;
            let group_model = test.group().insert_group("indieheads", 0).await?;
            let client = test_client(test.server.url());
            let analytics = EntryAnalyticsCache::new();
            let tasks = TaskQueue::new();
            let policy = PipelinePolicy::default();

            let now = Utc::now().naive_utc();
            let state_repo = GenerationStateRepository::new(&test.state.db);
            state_repo.get_or_create(group_model.id, now).await?;
            let acquired = state_repo
                .try_acquire(
                    group_model.id,
                    "other-runner",
                    now + Duration::seconds(600),
                    now,
                )
                .await?;
            assert!(acquired);

            let service =
                GenerationService::new(&test.state.db, &client, &analytics, &tasks, &policy);
            let result = service.start(group_model.id, &no_settings()).await;

            assert!(matches!(
                result,
                Err(Error::ChartError(ChartError::GenerationInProgress(_)))
            ));

            Ok(())
        }

        /// Expect an expired lease to be overturned by a new start
        #[tokio::test]
        async fn takes_over_an_expired_lease() -> Result<(), TestError> {
            let mut test = test_setup_with_chart_tables!()?;
            let group_model = test.group().insert_group("indieheads", 0).await?;
            let client = test_client(test.server.url());
            let analytics = EntryAnalyticsCache::new();
            let tasks = TaskQueue::new();
            let policy = PipelinePolicy::default();

            let now = Utc::now().naive_utc();
            let state_repo = GenerationStateRepository::new(&test.state.db);
            state_repo.get_or_create(group_model.id, now).await?;
            let acquired = state_repo
                .try_acquire(
                    group_model.id,
                    "crashed-runner",
                    now - Duration::seconds(30),
                    now,
                )
                .await?;
            assert!(acquired);

            let service =
                GenerationService::new(&test.state.db, &client, &analytics, &tasks, &policy);
            let result = service.start(group_model.id, &no_settings()).await;

            assert!(result.is_ok());
            let status = result.unwrap();
            assert!(status.in_progress);

            Ok(())
        }
    }

    mod status {
        use chorus_test_utils::prelude::*;
        use chrono::{Duration, Utc};

        use crate::server::data::generation::GenerationStateRepository;
        use crate::server::data::group::GroupRepository;
        use crate::server::error::{chart::ChartError, Error};
        use crate::server::scrobble::limiter::{RateLimitConfig, RateLimiter};
        use crate::server::scrobble::{ScrobbleClient, ScrobbleConfig};
        use crate::server::service::analytics::EntryAnalyticsCache;
        use crate::server::service::generation::{GenerationService, PipelinePolicy};
        use crate::server::worker::queue::TaskQueue;

        fn test_client(base_url: String) -> ScrobbleClient {
            ScrobbleClient::new(
                ScrobbleConfig {
                    base_url,
                    api_key: "test-api-key".to_string(),
                    user_agent: "chorus-test".to_string(),
                    request_timeout_secs: 5,
                },
                RateLimiter::new(RateLimitConfig::new(100.0, 100.0)),
            )
            .unwrap()
        }

        /// Expect a group that never generated to report an idle status
        #[tokio::test]
        async fn reports_idle_for_untouched_group() -> Result<(), TestError> {
            let mut test = test_setup_with_chart_tables!()?;
            let group_model = test.group().insert_group("indieheads", 0).await?;
            let client = test_client(test.server.url());
            let analytics = EntryAnalyticsCache::new();
            let tasks = TaskQueue::new();
            let policy = PipelinePolicy::default();

            let service =
                GenerationService::new(&test.state.db, &client, &analytics, &tasks, &policy);
            let result = service.status(group_model.id).await;

            assert!(result.is_ok());
            let status = result.unwrap();
            assert!(!status.in_progress);
            assert_eq!(status.current_week, 0);
            assert_eq!(status.total_weeks, 0);
            assert!(status.failed_members.is_empty());
            assert!(!status.last_run_aborted);

            Ok(())
        }

        /// Expect an unknown group to produce a not-found error
        #[tokio::test]
        async fn rejects_unknown_group() -> Result<(), TestError> {
            let test = test_setup_with_chart_tables!()?;
            let client = test_client(test.server.url());
            let analytics = EntryAnalyticsCache::new();
            let tasks = TaskQueue::new();
            let policy = PipelinePolicy::default();

            let group_repo = GroupRepository::new(&test.state.db);
            assert!(group_repo.get(1).await?.is_none());

            let service =
                GenerationService::new(&test.state.db, &client, &analytics, &tasks, &policy);
            let result = service.status(1).await;

            assert!(matches!(
                result,
                Err(Error::ChartError(ChartError::GroupNotFound(1)))
            ));

            Ok(())
        }

        /// Expect an expired lease to be reclaimed when status is read
        #[tokio::test]
        async fn reclaims_expired_lease_on_read() -> Result<(), TestError> {
            let mut test = test_setup_with_chart_tables!()?;
            let group_model = test.group().insert_group("indieheads", 0).await?;
            let client = test_client(test.server.url());
            let analytics = EntryAnalyticsCache::new();
            let tasks = TaskQueue::new();
            let policy = PipelinePolicy::default();

            let now = Utc::now().naive_utc();
            let state_repo = GenerationStateRepository::new(&test.state.db);
            state_repo.get_or_create(group_model.id, now).await?;
            let acquired = state_repo
                .try_acquire(
                    group_model.id,
                    "crashed-runner",
                    now - Duration::seconds(30),
                    now,
                )
                .await?;
            assert!(acquired);

            let service =
                GenerationService::new(&test.state.db, &client, &analytics, &tasks, &policy);
            let result = service.status(group_model.id).await;

            assert!(result.is_ok());
            let status = result.unwrap();
            assert!(!status.in_progress);
            assert!(status.last_run_aborted);

            Ok(())
        }
    }
}
