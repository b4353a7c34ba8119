//! In-process task queue for deferred statistics work.
//!
//! Chart generation finishes by enqueueing follow-up jobs (record recalculation, icon
//! refresh) that must not extend the time the generation lease is held. The queue is a
//! simple FIFO shared between the enqueueing services and the task pool dispatchers.
//!
//! ## Duplicate Guardrails
//!
//! [`TaskQueue::push`] skips jobs that are already queued with the same value. Stats
//! jobs are idempotent recalculations keyed by group, so collapsing duplicates from
//! back-to-back generation runs loses nothing.
//!
//! ## Shutdown
//!
//! [`TaskQueue::close`] rejects further pushes while letting dispatchers drain what is
//! already queued, so a shutdown never strands accepted work.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::server::{
    error::{task::TaskError, Error},
    model::task::TaskJob,
};

/// Shared FIFO queue feeding the background task pool.
#[derive(Clone)]
pub struct TaskQueue {
    inner: Arc<Mutex<QueueState>>,
}

struct QueueState {
    jobs: VecDeque<TaskJob>,
    closed: bool,
}

impl TaskQueue {
    /// Creates a new, open task queue.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(QueueState {
                jobs: VecDeque::new(),
                closed: false,
            })),
        }
    }

    /// Pushes a job to be executed as soon as a dispatcher picks it up.
    ///
    /// A job equal to one already queued is skipped.
    ///
    /// # Returns
    /// - `Ok(true)` - The job was added to the queue
    /// - `Ok(false)` - An identical job was already queued
    /// - `Err(Error::TaskError(TaskError::QueueClosed))` - The queue is shut down
    pub async fn push(&self, job: TaskJob) -> Result<bool, Error> {
        let mut state = self.inner.lock().await;

        if state.closed {
            return Err(Error::TaskError(TaskError::QueueClosed(job.to_string())));
        }

        if state.jobs.contains(&job) {
            tracing::debug!("Skipped duplicate task: {}", job);
            return Ok(false);
        }

        state.jobs.push_back(job);

        Ok(true)
    }

    /// Pops the oldest queued job.
    ///
    /// Remaining jobs stay retrievable after [`TaskQueue::close`] so dispatchers can
    /// drain the queue during shutdown.
    pub async fn pop(&self) -> Option<TaskJob> {
        let mut state = self.inner.lock().await;

        state.jobs.pop_front()
    }

    /// Number of jobs currently waiting in the queue.
    pub async fn len(&self) -> usize {
        let state = self.inner.lock().await;

        state.jobs.len()
    }

    /// Whether the queue currently holds no jobs.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Closes the queue, rejecting any further pushes.
    pub async fn close(&self) {
        let mut state = self.inner.lock().await;

        state.closed = true;
    }

    /// Whether the queue has been closed.
    pub async fn is_closed(&self) -> bool {
        let state = self.inner.lock().await;

        state.closed
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
