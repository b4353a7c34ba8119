//! Task pool for processing background jobs with concurrency control.
//!
//! This module provides the `TaskPool` that manages dispatcher tasks, job execution,
//! and concurrency limits using semaphores. The pool polls the in-process task queue
//! and spawns tasks to process jobs with configurable timeout and shutdown behavior.

mod config;

pub use config::TaskPoolConfig;

use std::sync::Arc;

use tokio::sync::{Notify, RwLock, Semaphore};
use tokio::task::JoinHandle;

use crate::server::worker::handler::TaskJobHandler;
use crate::server::{error::Error, worker::queue::TaskQueue};

/// Task pool for processing jobs from the [`TaskQueue`].
///
/// Manages dispatcher tasks that poll the queue for jobs and spawn execution tasks
/// with semaphore-based concurrency control. Provides graceful shutdown and monitoring.
#[derive(Clone)]
pub struct TaskPool {
    inner: Arc<TaskPoolRef>,
}

/// Internal task pool reference with configuration and runtime state.
///
/// Contains the pool configuration, job queue, handler, and runtime state including
/// the semaphore for concurrency control, shutdown notification, and dispatcher task
/// handles. This struct is wrapped in an Arc by `TaskPool` for cheap cloning.
pub struct TaskPoolRef {
    config: TaskPoolConfig,
    queue: TaskQueue,
    handler: Arc<TaskJobHandler>,
    semaphore: Arc<Semaphore>,
    shutdown: Arc<Notify>,
    dispatcher_handles: Arc<RwLock<Vec<JoinHandle<()>>>>,
}

impl TaskPool {
    /// Creates a new task pool.
    ///
    /// The pool is created in a stopped state and must be started with `start()`.
    ///
    /// # Arguments
    /// - `config` - Configuration including max concurrent jobs and dispatcher settings
    /// - `queue` - Shared job queue the dispatchers poll
    /// - `handler` - Job handler executing the different job types
    pub fn new(config: TaskPoolConfig, queue: TaskQueue, handler: TaskJobHandler) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        let shutdown = Arc::new(Notify::new());

        Self {
            inner: Arc::new(TaskPoolRef {
                config,
                handler: Arc::new(handler),
                queue,
                semaphore,
                shutdown,
                dispatcher_handles: Arc::new(RwLock::new(Vec::new())),
            }),
        }
    }

    /// Starts the task pool.
    ///
    /// Spawns the configured number of dispatcher tasks that poll the queue for jobs
    /// and spawn execution tasks. The semaphore controls maximum concurrency.
    ///
    /// This method is non-blocking and returns immediately after spawning dispatchers.
    /// It is idempotent, calling it when already running logs a warning and returns Ok.
    ///
    /// # Returns
    /// - `Ok(())` - Pool started successfully (or already running)
    /// - `Err(Error)` - Failed to start pool
    pub async fn start(&self) -> Result<(), Error> {
        let mut handles = self.inner.dispatcher_handles.write().await;

        if !handles.is_empty() {
            tracing::warn!("Task pool is already running");
            return Ok(());
        }

        tracing::info!(
            "Starting task pool with {} dispatcher(s) (max {} concurrent jobs)",
            self.inner.config.dispatcher_count,
            self.inner.config.max_concurrent_jobs
        );

        for id in 0..self.inner.config.dispatcher_count {
            let handle = self.spawn_dispatcher(id);
            handles.push(handle);
        }

        Ok(())
    }

    /// Spawns a single dispatcher task.
    ///
    /// Creates a tokio task that continuously polls the queue for jobs and spawns
    /// execution tasks. The dispatcher respects shutdown signals and exits cleanly.
    ///
    /// # Arguments
    /// - `id` - Dispatcher identifier for logging
    fn spawn_dispatcher(&self, id: usize) -> JoinHandle<()> {
        let config = self.inner.config.clone();
        let queue = self.inner.queue.clone();
        let handler = Arc::clone(&self.inner.handler);
        let semaphore = Arc::clone(&self.inner.semaphore);
        let shutdown = Arc::clone(&self.inner.shutdown);

        tokio::spawn(async move {
            tracing::debug!("Dispatcher {} started", id);

            loop {
                tokio::select! {
                    // Biased select ensures the shutdown signal is prioritized
                    // over processing new jobs, enabling faster shutdown.
                    biased;

                    _ = shutdown.notified() => {
                        tracing::debug!("Dispatcher {} received shutdown signal", id);
                        break;
                    }

                    _ = Self::process_jobs(
                        &config,
                        &queue,
                        &handler,
                        &semaphore,
                    ) => {
                        // Continue to next iteration
                    }
                }
            }

            tracing::debug!("Dispatcher {} stopped", id);
        })
    }

    /// Processes jobs from the queue.
    ///
    /// Pops a job and spawns a task to process it if one is available. Blocks on the
    /// semaphore when at capacity and sleeps when the queue is empty. Jobs popped
    /// while the semaphore is already closed are dropped with a warning, the pool is
    /// shutting down at that point and stats jobs are safe to lose.
    ///
    /// # Arguments
    /// - `config` - Pool configuration for timing values
    /// - `queue` - Job queue to poll
    /// - `handler` - Job handler for execution
    /// - `semaphore` - Concurrency limit semaphore
    async fn process_jobs(
        config: &TaskPoolConfig,
        queue: &TaskQueue,
        handler: &Arc<TaskJobHandler>,
        semaphore: &Arc<Semaphore>,
    ) {
        match queue.pop().await {
            Some(job) => match semaphore.clone().acquire_owned().await {
                Ok(permit) => {
                    let handler = Arc::clone(handler);
                    let timeout = config.job_timeout();

                    tokio::spawn(async move {
                        Self::execute_job(job, handler, timeout, permit).await;
                    });
                }
                Err(_) => {
                    tracing::warn!("Task pool is shutting down, dropped job: {}", job);
                }
            },
            None => {
                // Queue is empty, sleep before the next poll
                tokio::time::sleep(config.poll_interval()).await;
            }
        }
    }

    /// Executes a job with timeout.
    ///
    /// Wraps job execution with a timeout to prevent hung jobs. The semaphore permit
    /// is held until completion, limiting concurrency.
    ///
    /// # Arguments
    /// - `job` - Task job to execute
    /// - `handler` - Job handler for execution
    /// - `timeout` - Maximum execution time
    /// - `_permit` - Semaphore permit (held until dropped)
    async fn execute_job(
        job: crate::server::model::task::TaskJob,
        handler: Arc<TaskJobHandler>,
        timeout: std::time::Duration,
        _permit: tokio::sync::OwnedSemaphorePermit,
    ) {
        let result = tokio::time::timeout(timeout, handler.handle(&job)).await;

        match result {
            Ok(Ok(())) => {
                tracing::debug!("Job completed: {}", job);
            }
            Ok(Err(e)) => {
                tracing::error!("Job failed: {}, error: {:?}", job, e);
            }
            Err(_) => {
                tracing::error!("Job timed out after {} seconds: {}", timeout.as_secs(), job);
            }
        }

        // Permit automatically dropped here, releasing the semaphore slot
    }

    /// Stops the task pool gracefully.
    ///
    /// Closes the queue for new pushes, closes the semaphore so no further jobs start,
    /// and signals all dispatchers to stop, waiting for each with a configured timeout.
    /// In-flight job tasks continue to completion.
    ///
    /// This method is idempotent, calling it when already stopped returns immediately.
    ///
    /// # Returns
    /// - `Ok(())` - Pool stopped successfully (or already stopped)
    /// - `Err(Error)` - Failed to stop pool
    pub async fn stop(&self) -> Result<(), Error> {
        if !self.is_running().await {
            tracing::debug!("Task pool is already stopped");
            return Ok(());
        }

        tracing::info!("Shutting down task pool...");

        self.inner.queue.close().await;
        self.inner.semaphore.close();
        self.inner.shutdown.notify_waiters();

        let mut handles = self.inner.dispatcher_handles.write().await;
        let dispatcher_count = handles.len();

        for (i, handle) in handles.drain(..).enumerate() {
            let timeout_result =
                tokio::time::timeout(self.inner.config.shutdown_timeout(), handle).await;

            match timeout_result {
                Ok(Ok(())) => {
                    tracing::debug!("Dispatcher {} stopped cleanly", i);
                }
                Ok(Err(e)) => {
                    tracing::error!("Dispatcher {} panicked: {:?}", i, e);
                }
                Err(_) => {
                    tracing::warn!("Dispatcher {} did not stop within timeout", i);
                }
            }
        }

        tracing::info!(
            "Task pool shut down ({} dispatchers stopped, in-flight tasks will complete)",
            dispatcher_count
        );

        Ok(())
    }

    /// Checks if the task pool is running.
    ///
    /// # Returns
    /// - `true` - Pool has active dispatchers
    /// - `false` - Pool is stopped
    pub async fn is_running(&self) -> bool {
        let handles = self.inner.dispatcher_handles.read().await;
        !handles.is_empty()
    }

    /// Gets the number of active dispatchers.
    pub async fn dispatcher_count(&self) -> usize {
        let handles = self.inner.dispatcher_handles.read().await;
        handles.len()
    }

    /// Gets the number of available semaphore permits.
    ///
    /// This indicates how many more jobs can start before hitting the concurrency
    /// limit. A value of 0 means the pool is at capacity.
    pub fn available_permits(&self) -> usize {
        self.inner.semaphore.available_permits()
    }

    /// Gets the current number of jobs being processed.
    pub fn active_job_count(&self) -> usize {
        self.inner.config.max_concurrent_jobs - self.inner.semaphore.available_permits()
    }
}
