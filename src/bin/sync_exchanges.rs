//! Standalone exchange sync worker: runs the sync job without the HTTP API
//! until Ctrl-C.

use std::sync::Arc;

use exchange_register::{
    config::AppConfig,
    jobs::exchange_sync::{start_exchange_sync_job, ExchangeSyncJob},
    services::{
        exchange_rate::ExchangeRateService, exchange_sync::ExchangeSyncService,
        rate_provider::build_rate_provider,
    },
    shutdown::Shutdown,
    store::ExchangeStore,
};
use sea_orm::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,exchange_register=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    let exchanges = Arc::new(ExchangeRateService::new(db.clone()));
    let sync = ExchangeSyncService::new(build_rate_provider(&config.provider)?, exchanges);
    let job = ExchangeSyncJob::new(&config.sync, sync);

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    tracing::info!("Exchange sync running... (press Ctrl+C to quit)");
    start_exchange_sync_job(job, shutdown).await?;

    ExchangeStore::close(&db).await?;
    tracing::info!("Exchange sync stopped");

    Ok(())
}
