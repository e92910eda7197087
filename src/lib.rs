// src/lib.rs

use axum::{routing::get, Router};
use services::exchange_listing::ExchangeListingService;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub exchange_listing: ExchangeListingService,
}

pub mod entities {
    pub mod prelude;
    pub mod exchanges;
    pub mod exchange_rate_history;
}

pub mod services {
    pub mod rate_provider;
    pub mod exchange_rate_api;
    pub mod freecurrency_api;
    pub mod exchange_rate;
    pub mod exchange_sync;
    pub mod exchange_listing;
}

pub mod config;
pub mod handlers;
pub mod jobs;
pub mod models;
pub mod shutdown;
pub mod store;

/// Routes served by the exchange register API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(handlers::status::get_status))
        .route("/exchanges", get(handlers::exchanges::list_exchanges))
        .route("/openapi.json", get(handlers::openapi::get_openapi))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
