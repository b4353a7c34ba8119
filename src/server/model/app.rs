use sea_orm::DatabaseConnection;

use crate::server::{
    scrobble::client::ScrobbleClient,
    service::{analytics::EntryAnalyticsCache, generation::PipelinePolicy},
    worker::queue::TaskQueue,
};

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub scrobble_client: ScrobbleClient,
    /// Cached per-entry aggregates, invalidated by generation runs.
    pub analytics: EntryAnalyticsCache,
    /// Queue feeding the background task pool.
    pub tasks: TaskQueue,
    /// Tunables of the chart generation pipeline.
    pub policy: PipelinePolicy,
}

