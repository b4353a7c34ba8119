pub mod handler;
pub mod pool;
pub mod queue;

pub use pool::TaskPool;
pub use queue::TaskQueue;

use crate::server::worker::{handler::TaskJobHandler, pool::TaskPoolConfig};

/// Background task processing unit pairing the shared queue with its pool.
#[derive(Clone)]
pub struct Worker {
    pub queue: TaskQueue,
    pub pool: TaskPool,
}

impl Worker {
    pub fn new(config: TaskPoolConfig, handler: TaskJobHandler) -> Self {
        let queue = TaskQueue::new();
        let pool = TaskPool::new(config, queue.clone(), handler);

        Self { queue, pool }
    }
}
