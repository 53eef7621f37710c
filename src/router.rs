use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    AppState,
    middleware::{auth_middleware, log_errors},
    routes,
};

/// 无需认证的路由
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(routes::root::root))
        // 商品
        .route("/products", get(routes::product::list_products))
        .route("/products/to_display", get(routes::product::list_to_display))
        .route("/products/{id}", get(routes::product::get_product))
        // 城市与运费
        .route("/cities", get(routes::city::list_cities))
        .route("/delivery/calculate", post(routes::delivery::calculate))
        // 支付
        .route("/payments", post(routes::payment::init_payment))
        // 促销码
        .route("/promo", get(routes::promo::list_promo_codes))
        .route("/promo/{code}", get(routes::promo::get_promo_code))
        // 用户
        .route("/users", post(routes::user::register))
        .route("/users/login", post(routes::user::login))
        // 邮件
        .route("/email", post(routes::email::send_email))
        .route("/email/callback", post(routes::email::email_callback))
}

/// 需要 Bearer 令牌的路由
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/requests", get(routes::request::list_requests))
        .route("/requests/{id}", get(routes::request::get_request))
        .route("/promo", post(routes::promo::create_promo_code))
        .route("/users", get(routes::user::list_users))
        .route("/users/{id}", get(routes::user::get_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if !origins.is_empty() {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {}", origin);
                    None
                }
            })
            .collect();
        return Some(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    // 未配置来源时，开发环境允许所有来源
    if cfg!(debug_assertions) {
        tracing::debug!("Adding permissive CORS layer for development mode");
        Some(CorsLayer::permissive())
    } else {
        None
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state));

    // nest 不接受空路径，未配置前缀时直接挂在根上
    let base = state.config.api_base_uri.trim_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(&format!("/{}", base), api)
    };

    let router = router
        .layer(axum::middleware::from_fn(log_errors))
        .layer(TraceLayer::new_for_http());

    let router = match cors_layer(&state.config.cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}
