//! Scheduler for periodic chart pipeline maintenance.
//!
//! This module provides a cron-based job scheduler that watches over the persisted
//! generation leases. A run that dies without releasing its lease would otherwise leave
//! its group locked; the watchdog job reclaims such leases on a fixed interval so the
//! group becomes generatable again without operator intervention.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::error::Error;

pub mod config;
pub mod watchdog;

/// Job scheduler for background chart pipeline maintenance.
///
/// The scheduler currently manages a single job: the generation lease watchdog, which
/// reclaims leases whose owning run died mid-generation.
pub struct Scheduler {
    db: DatabaseConnection,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    ///
    /// Initializes the underlying `JobScheduler` and prepares the scheduler with the provided
    /// database connection.
    ///
    /// # Arguments
    /// - `db` - Database connection the maintenance jobs run against
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(db: DatabaseConnection) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self { db, sched })
    }

    /// Registers all scheduled jobs and starts the scheduler.
    ///
    /// Registers the lease watchdog with its cron schedule, then starts the scheduler.
    /// Once started, jobs run automatically according to their cron expressions until the
    /// scheduler is stopped.
    ///
    /// # Returns
    /// - `Ok(())` - All jobs successfully registered and scheduler started
    /// - `Err(Error)` - Failed to register a job or start the scheduler
    pub async fn start(mut self) -> Result<(), Error> {
        self.schedule_job(
            config::watchdog::CRON_EXPRESSION,
            "lease watchdog",
            watchdog::reclaim_expired_leases,
        )
        .await?;

        // Start the scheduler
        self.sched.start().await?;

        Ok(())
    }

    /// Schedules a recurring job with the specified cron expression.
    ///
    /// Registers a new asynchronous job with the scheduler that executes the provided
    /// function according to the cron expression. The function receives a clone of the
    /// database connection.
    ///
    /// On execution, the job logs the number of items it processed (on success) or any
    /// error that occurred.
    ///
    /// # Arguments
    /// - `cron` - Cron expression defining when the job should run (e.g., "0 */5 * * * *" for every 5 minutes)
    /// - `name` - Human-readable name for the job (used in log messages)
    /// - `function` - Async maintenance function returning the count of items it processed
    ///
    /// # Returns
    /// - `Ok(())` - Job successfully registered with the scheduler
    /// - `Err(Error)` - Failed to create or add the job (invalid cron expression or scheduler error)
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(DatabaseConnection) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<usize, Error>> + Send + 'static,
    {
        let db = self.db.clone();
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let db = db.clone();
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(db).await {
                        Ok(count) => tracing::debug!("{} processed {} item(s)", name, count),
                        Err(e) => tracing::error!("Error running {} job: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}
