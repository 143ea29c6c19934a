use crate::model::HealthResponse;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn not_found_handler() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}
