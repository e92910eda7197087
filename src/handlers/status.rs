use axum::Json;

use crate::models::status::StatusResponse;

/// Handler for GET /status
#[utoipa::path(
    get,
    path = "/status",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = StatusResponse))
)]
pub async fn get_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}
