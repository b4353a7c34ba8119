use sea_orm::DatabaseConnection;

use crate::server::{
    config::Config,
    error::Error,
    scheduler::Scheduler,
    scrobble::{RateLimiter, ScrobbleClient},
    service::analytics::EntryAnalyticsCache,
    worker::{handler::TaskJobHandler, pool::TaskPoolConfig, Worker},
};

/// Build the scrobble client with the configured credentials and rate limit
pub fn build_scrobble_client(config: &Config) -> Result<ScrobbleClient, Error> {
    let limiter = RateLimiter::new(config.rate_limit);
    let scrobble_client = ScrobbleClient::new(config.scrobble.clone(), limiter)?;

    Ok(scrobble_client)
}

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Build the background task worker and start its pool
pub async fn start_worker(
    config: &Config,
    db: DatabaseConnection,
    analytics: EntryAnalyticsCache,
) -> Result<Worker, Error> {
    let pool_config = TaskPoolConfig::new(config.max_concurrent_jobs);
    let handler = TaskJobHandler::new(db, analytics);

    let worker = Worker::new(pool_config, handler);
    worker.pool.start().await?;

    Ok(worker)
}

/// Start the cron scheduler with the lease watchdog registered
pub async fn start_scheduler(db: DatabaseConnection) -> Result<(), Error> {
    let scheduler = Scheduler::new(db).await?;
    scheduler.start().await?;

    Ok(())
}
