use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    AppState,
    error::{AppError, AppResult},
    services::cdek::DeliveryIn,
};

/// 按配置的资费计算运费，单个资费失败不影响其他结果
#[axum::debug_handler]
pub async fn calculate(
    State(state): State<AppState>,
    Json(req): Json<DeliveryIn>,
) -> AppResult<impl IntoResponse> {
    if req.packages.is_empty() {
        return Err(AppError::Validation("at least one package is required".into()));
    }

    tracing::info!(
        "Calculating delivery to {} ({}) for {} package(s)",
        req.city_name,
        req.city_code,
        req.packages.len()
    );
    let quotes = state.cdek.calculate(&req).await?;

    // 直接返回资费数组，不套统一响应结构
    Ok((StatusCode::OK, Json(quotes)))
}
