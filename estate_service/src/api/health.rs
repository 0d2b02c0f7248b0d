use axum::{Router, http::StatusCode, response::Json, routing::get};
use serde_json::{Value, json};

pub fn router() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "service is up"),
    )
)]
#[tracing::instrument]
pub async fn health_handler() -> Result<Json<Value>, StatusCode> {
    tracing::debug!("health check requested");

    Ok(Json(json!({
        "status": "ok",
        "service": "estate_service"
    })))
}
