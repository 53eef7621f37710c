use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

#[axum::debug_handler]
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"message": "Hello World"})))
}
