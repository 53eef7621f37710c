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

use super::model::Product;

#[axum::debug_handler]
pub async fn list_products(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let products = Product::find_published(
        &state.pool,
        state.cache.as_ref(),
        state.config.products_cache_ttl,
    )
    .await?;

    Ok((StatusCode::OK, success_to_api_response(products)))
}

#[axum::debug_handler]
pub async fn list_to_display(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let products = Product::find_to_display(
        &state.pool,
        state.cache.as_ref(),
        state.config.products_cache_ttl,
    )
    .await?;

    Ok((StatusCode::OK, success_to_api_response(products)))
}

#[axum::debug_handler]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let product = Product::find_by_id(
        &state.pool,
        state.cache.as_ref(),
        state.config.products_cache_ttl,
        id,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("product {}", id)))?;

    Ok((StatusCode::OK, success_to_api_response(product)))
}
