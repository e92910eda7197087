use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    models::{
        exchange::{ListExchangesQuery, ListExchangesResponse},
        status::ErrorResponse,
    },
    AppState,
};

/// Handler for GET /exchanges
/// Lists current exchange rates, optionally filtered by source and/or target currency
#[utoipa::path(
    get,
    path = "/exchanges",
    tag = "Exchanges",
    params(ListExchangesQuery),
    responses(
        (status = 200, description = "Current exchange rates", body = [crate::models::exchange::ExchangeResponse]),
        (status = 500, description = "Exchanges could not be read", body = ErrorResponse)
    )
)]
pub async fn list_exchanges(
    State(state): State<AppState>,
    Query(query): Query<ListExchangesQuery>,
) -> Result<Json<ListExchangesResponse>, (StatusCode, Json<ErrorResponse>)> {
    tracing::debug!("Listing exchanges with query: {:?}", query);

    match state.exchange_listing.list(&query).await {
        Ok(exchanges) => Ok(Json(exchanges)),
        Err(e) => {
            // Detail stays in the log; callers get a generic message.
            tracing::error!("Failed to list exchanges: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to list exchanges".to_string(),
                }),
            ))
        }
    }
}
