use chorus::server::{self, service::analytics::EntryAnalyticsCache};

#[tokio::main]
async fn main() {
    use chorus::server::{config::Config, model::app::AppState, startup};

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let scrobble_client = startup::build_scrobble_client(&config).unwrap();
    let db = startup::connect_to_database(&config).await.unwrap();

    let analytics = EntryAnalyticsCache::new();
    let worker = startup::start_worker(&config, db.clone(), analytics.clone())
        .await
        .unwrap();
    startup::start_scheduler(db.clone()).await.unwrap();

    tracing::info!("Starting server");

    let state = AppState {
        db,
        scrobble_client,
        analytics,
        tasks: worker.queue.clone(),
        policy: config.pipeline.clone(),
    };

    let router = server::router::routes().with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap();

    tracing::info!("Listening on port {}", config.port);

    axum::serve(listener, router).await.unwrap();
}
