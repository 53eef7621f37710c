use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    middleware::CurrentUser,
    utils::success_to_api_response,
};

use super::model::{CreatePromoCodeRequest, PromoCode};

#[axum::debug_handler]
pub async fn list_promo_codes(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let codes = PromoCode::find_all_with_email(&state.pool).await?;
    Ok((StatusCode::OK, success_to_api_response(codes)))
}

#[axum::debug_handler]
pub async fn get_promo_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let promo = PromoCode::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("promo code {}", code)))?;

    Ok((StatusCode::OK, success_to_api_response(promo)))
}

#[axum::debug_handler]
pub async fn create_promo_code(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreatePromoCodeRequest>,
) -> AppResult<impl IntoResponse> {
    current.require_admin()?;
    req.validate().map_err(AppError::Validation)?;

    let promo = PromoCode::create(&state.pool, req)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("promo code already exists".into())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::Validation("owner user does not exist".into())
            }
            _ => AppError::from(e),
        })?;
    tracing::info!("User {} created promo code {}", current.0.id, promo.code);

    Ok((StatusCode::CREATED, success_to_api_response(promo)))
}
