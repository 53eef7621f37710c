use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{AppState, error::AppResult, utils::success_to_api_response};

use super::model::City;

#[axum::debug_handler]
pub async fn list_cities(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let cities = City::find_all(
        &state.pool,
        state.cache.as_ref(),
        state.config.cities_cache_ttl,
    )
    .await?;

    Ok((StatusCode::OK, success_to_api_response(cities)))
}
