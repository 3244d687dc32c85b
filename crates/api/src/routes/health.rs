use axum::Json;
use erpgate_domain::constants::SERVICE_NAME;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// `GET /health` - liveness only, no upstream checks.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok", service: SERVICE_NAME })
}
