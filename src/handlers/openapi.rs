use axum::Json;
use utoipa::OpenApi;

use crate::models::{
    exchange::ExchangeResponse,
    status::{ErrorResponse, StatusResponse},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Exchange Register API",
        version = "1.0.0",
        description = "Currency exchange rate tracking service that syncs exchange rates from external APIs and exposes them via REST endpoints"
    ),
    paths(
        crate::handlers::status::get_status,
        crate::handlers::exchanges::list_exchanges,
        get_openapi,
    ),
    components(schemas(ExchangeResponse, StatusResponse, ErrorResponse)),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Exchanges", description = "Exchange rate management"),
        (name = "Documentation", description = "API documentation endpoints")
    )
)]
pub struct ApiDoc;

/// Handler for GET /openapi.json
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "Documentation",
    responses((status = 200, description = "OpenAPI specification"))
)]
pub async fn get_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
