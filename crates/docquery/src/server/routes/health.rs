//! Liveness probe

use axum::Json;
use serde_json::{json, Value};

/// GET /healthcheck - fixed healthy status
pub async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
