use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    utils::success_to_api_response,
};

use super::model::Request;

#[axum::debug_handler]
pub async fn list_requests(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let requests = Request::find_all(
        &state.pool,
        state.cache.as_ref(),
        state.config.requests_cache_ttl,
    )
    .await?;

    Ok((StatusCode::OK, success_to_api_response(requests)))
}

#[axum::debug_handler]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let request = Request::find_by_id(
        &state.pool,
        state.cache.as_ref(),
        state.config.requests_cache_ttl,
        id,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("request {}", id)))?;

    Ok((StatusCode::OK, success_to_api_response(request)))
}
