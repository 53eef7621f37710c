use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    AppState,
    error::{AppError, AppResult},
    routes::request::{NewRequest, Request},
    services::payment::{CheckoutIn, payment_id},
};

/// 创建订单并初始化支付
///
/// 订单先落库拿到编号，再用编号签名调用网关，最后回写签名和支付号。
#[axum::debug_handler]
pub async fn init_payment(
    State(state): State<AppState>,
    Json(req): Json<CheckoutIn>,
) -> AppResult<impl IntoResponse> {
    if req.amount <= 0 {
        return Err(AppError::Validation("Amount must be positive".into()));
    }

    let new_request = NewRequest::try_from(&req)
        .map_err(|e| AppError::Internal(format!("could not encode receipt items: {}", e)))?;
    let request = Request::create(&state.pool, new_request).await?;
    tracing::info!("Created request {} for {}", request.id, request.email);

    let token = state.payments.generate_token(req.amount, request.id);
    let result = state.payments.init_payment(&req, request.id, &token).await?;
    let payment_id = payment_id(&result)?;

    Request::set_payment(&state.pool, request.id, &token, &payment_id).await?;

    // 前端直接读取网关返回的 PaymentURL
    Ok((StatusCode::OK, Json(result)))
}
