use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use crate::{
    AppState,
    error::{AppError, AppResult},
    services::email::{OutgoingEmail, callback_body},
    utils::success_to_api_response,
};

const CALLBACK_SUBJECT: &str = "Обратный звонок";

#[derive(Debug, Deserialize)]
pub struct EmailIn {
    pub subject: String,
    pub body: String,
    /// `plain` 或 `html`
    pub msg_type: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailCallbackIn {
    pub name: String,
    pub phone: String,
}

#[axum::debug_handler]
pub async fn send_email(
    State(state): State<AppState>,
    Json(req): Json<EmailIn>,
) -> AppResult<impl IntoResponse> {
    let html = match req.msg_type.as_str() {
        "plain" => false,
        "html" => true,
        other => {
            return Err(AppError::Validation(format!("unsupported msg_type {:?}", other)));
        }
    };

    state
        .mailer
        .send(OutgoingEmail {
            to: state.config.email_to.clone(),
            subject: req.subject,
            body: req.body,
            html,
        })
        .await?;

    Ok((StatusCode::OK, success_to_api_response(())))
}

/// 回拨请求，发给运营邮箱
#[axum::debug_handler]
pub async fn email_callback(
    State(state): State<AppState>,
    Json(req): Json<EmailCallbackIn>,
) -> AppResult<impl IntoResponse> {
    if req.phone.trim().is_empty() {
        return Err(AppError::Validation("phone must not be empty".into()));
    }

    state
        .mailer
        .send(OutgoingEmail {
            to: state.config.email_to.clone(),
            subject: CALLBACK_SUBJECT.into(),
            body: callback_body(&req.name, &req.phone),
            html: true,
        })
        .await?;

    Ok((StatusCode::OK, success_to_api_response(())))
}
