use axum::response::IntoResponse;
use axum::Json;
use chrono::{SecondsFormat, Utc};

/// GET /health: liveness probe, never fails.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
