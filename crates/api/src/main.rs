use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use catalog_api::{
    app::{create_app, AppState},
    config::Config,
    middleware::{init_logging, init_metrics},
    services::{HttpKeySource, VideoStatsSource, YoutubeStatsClient, ZeroStats},
};
use persistence::PgCatalogStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    init_logging(&config.logging);
    init_metrics().context("Failed to install metrics recorder")?;

    info!("Starting Catalog API v{}", env!("CARGO_PKG_VERSION"));

    let db_config: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    let key_source = HttpKeySource::new(
        &config.identity.base_url,
        Duration::from_secs(config.identity.fetch_timeout_secs),
        config.identity.fetch_retries,
    )?;

    let video_stats: Arc<dyn VideoStatsSource> = if config.youtube.enabled {
        Arc::new(YoutubeStatsClient::new(
            &config.youtube.base_url,
            &config.youtube.api_key,
            Duration::from_millis(config.youtube.timeout_ms),
        )?)
    } else {
        info!("YouTube stats disabled, detail responses report zero counts");
        Arc::new(ZeroStats)
    };

    let addr = config.socket_addr()?;
    let state = AppState::new(
        config,
        Arc::new(PgCatalogStore::new(pool)),
        Arc::new(key_source),
        video_stats,
    );
    let app = create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
