use sea_orm::DatabaseConnection;

use crate::server::{
    error::Error,
    model::task::TaskJob,
    service::{
        analytics::EntryAnalyticsCache,
        stats::{
            alltime::AlltimeService, contribution::ContributionService,
            entry_history::EntryHistoryService, icon::IconService, records::RecordService,
        },
    },
};

/// Handler for processing task jobs from the queue
///
/// This handler provides a centralized interface for executing the different deferred
/// statistics jobs. Each job type has a corresponding method that holds the specific
/// business logic.
pub struct TaskJobHandler {
    db: DatabaseConnection,
    analytics: EntryAnalyticsCache,
}

impl TaskJobHandler {
    /// Create a new TaskJobHandler
    pub fn new(db: DatabaseConnection, analytics: EntryAnalyticsCache) -> Self {
        Self { db, analytics }
    }

    /// Handle a task job by delegating to the appropriate handler method
    ///
    /// This is the main entry point for job processing. It dispatches the job to the
    /// correct handler method based on the job type.
    pub async fn handle(&self, job: &TaskJob) -> Result<(), Error> {
        match job {
            TaskJob::RecalculateRecords { group_id } => {
                self.recalculate_records(*group_id).await
            }
            TaskJob::RefreshGroupIcon { group_id } => self.refresh_group_icon(*group_id).await,
            TaskJob::RebuildStats { group_id } => self.rebuild_stats(*group_id).await,
        }
    }

    /// Recalculate chart records and entry major drivers for a group
    pub async fn recalculate_records(&self, group_id: i32) -> Result<(), Error> {
        tracing::debug!("Processing record recalculation for group_id: {}", group_id);

        RecordService::new(&self.db, &self.analytics)
            .recalculate(group_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to recalculate records for group {}: {:?}",
                    group_id,
                    e
                );
                e
            })?;

        tracing::debug!("Successfully recalculated records for group {}", group_id);

        Ok(())
    }

    /// Refresh the artist a group's icon is derived from
    pub async fn refresh_group_icon(&self, group_id: i32) -> Result<(), Error> {
        tracing::debug!("Processing icon refresh for group_id: {}", group_id);

        IconService::new(&self.db)
            .refresh(group_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to refresh icon for group {}: {:?}", group_id, e);
                e
            })?;

        tracing::debug!("Successfully refreshed icon for group {}", group_id);

        Ok(())
    }

    /// Rebuild every derived statistic of a group from its stored charts
    ///
    /// Entry history and contributions are replayed first, then the all-time ranking
    /// and records are recomputed from the rebuilt history.
    pub async fn rebuild_stats(&self, group_id: i32) -> Result<(), Error> {
        tracing::info!("Processing stats rebuild for group_id: {}", group_id);

        EntryHistoryService::new(&self.db)
            .rebuild(group_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to rebuild entry history for group {}: {:?}",
                    group_id,
                    e
                );
                e
            })?;

        ContributionService::new(&self.db)
            .rebuild(group_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to rebuild contributions for group {}: {:?}",
                    group_id,
                    e
                );
                e
            })?;

        AlltimeService::new(&self.db)
            .rebuild(group_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to rebuild the all-time ranking for group {}: {:?}",
                    group_id,
                    e
                );
                e
            })?;

        RecordService::new(&self.db, &self.analytics)
            .recalculate(group_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to recalculate records for group {}: {:?}",
                    group_id,
                    e
                );
                e
            })?;

        tracing::info!("Successfully rebuilt stats for group {}", group_id);

        Ok(())
    }
}
