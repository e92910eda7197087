use exchange_register::{
    build_router,
    config::AppConfig,
    jobs::exchange_sync::{start_exchange_sync_job, ExchangeSyncJob},
    services::{
        exchange_listing::ExchangeListingService,
        exchange_rate::{ExchangeRateService, ExchangeService},
        exchange_sync::ExchangeSyncService,
        rate_provider::build_rate_provider,
    },
    shutdown::Shutdown,
    store::ExchangeStore,
    AppState,
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
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

    // Connect to database
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None).await?;

    // Start server; bound before the sync job is spawned
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    let exchanges: Arc<dyn ExchangeService> = Arc::new(ExchangeRateService::new(db.clone()));
    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let sync_handle = if config.sync.enabled {
        let provider = build_rate_provider(&config.provider)?;
        let job = ExchangeSyncJob::new(
            &config.sync,
            ExchangeSyncService::new(provider, exchanges.clone()),
        );
        Some(start_exchange_sync_job(job, shutdown.clone()))
    } else {
        tracing::info!("Exchange sync disabled (set EXCHANGE_SYNC_ENABLED=true to enable)");
        None
    };

    let state = AppState {
        exchange_listing: ExchangeListingService::new(exchanges),
    };
    let app = build_router(state);

    let server_shutdown = shutdown.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move { server_shutdown.triggered().await })
        .await;

    // The job stops at the next pair boundary whichever way the server ended
    shutdown.trigger();
    if let Some(handle) = sync_handle {
        if let Err(e) = handle.await {
            tracing::error!("Exchange sync job ended abnormally: {}", e);
        }
    }

    served?;
    ExchangeStore::close(&db).await?;
    tracing::info!("Exchange register stopped");

    Ok(())
}
