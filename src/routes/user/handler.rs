use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    utils::{generate_token, hash_password, success_to_api_response, verify_password},
};

use super::model::{CreateUserRequest, LoginForm, LoginResponse, User, UserOut};

const INVALID_CREDENTIALS: &str = "Invalid Credentials";

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    // 邮箱和密码的基本校验
    let email = req.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("invalid email address".into()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("password must not be empty".into()));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::Internal(format!("failed to hash password: {}", e)))?;
    let req = CreateUserRequest { email, ..req };

    let user = User::create(&state.pool, req, password_hash)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("user with this email already exists".into())
            }
            _ => AppError::from(e),
        })?;
    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, success_to_api_response(user)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<impl IntoResponse> {
    let user = User::find_by_email(&state.pool, form.username.trim())
        .await?
        .ok_or_else(|| AppError::Forbidden(INVALID_CREDENTIALS.into()))?;

    let valid = verify_password(&form.password, &user.password)
        .map_err(|e| AppError::Internal(format!("failed to verify password: {}", e)))?;
    if !valid {
        return Err(AppError::Forbidden(INVALID_CREDENTIALS.into()));
    }

    let (access_token, _) = generate_token(user.id, user.admin != 0, &state.config)
        .map_err(|e| AppError::Internal(format!("failed to issue token: {}", e)))?;

    Ok((
        StatusCode::OK,
        success_to_api_response(LoginResponse {
            access_token,
            token_type: "bearer".into(),
        }),
    ))
}

#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users = UserOut::find_all(&state.pool).await?;
    Ok((StatusCode::OK, success_to_api_response(users)))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user = UserOut::find_by_id(
        &state.pool,
        state.cache.as_ref(),
        state.config.user_cache_ttl,
        id,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;

    Ok((StatusCode::OK, success_to_api_response(user)))
}
