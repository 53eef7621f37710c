mod common;

use axum::http::{StatusCode, header};
use chrono::Utc;
use serde_json::json;
use storefront::{routes::user::UserOut, utils::generate_token};
use tower::ServiceExt;

use common::{get, get_with_token, json_request, read_json, spawn_app};

fn user(id: i32, admin: i32) -> UserOut {
    UserOut {
        id,
        email: format!("user{}@example.com", id),
        first_name: Some("Ivan".into()),
        last_name: None,
        phone: None,
        admin,
        is_verified: true,
        created_at: Utc::now(),
    }
}

fn order(id: i32) -> serde_json::Value {
    json!({
        "id": id,
        "amount": 150000,
        "bug": "[]",
        "city": "Moscow",
        "zip": "101000",
        "address": "Tverskaya 1",
        "first_name": "Ivan",
        "last_name": "Petrov",
        "phone": "+79990000000",
        "email": "buyer@example.com",
        "status": "NEW",
        "payment_id": "700",
        "token": "abc",
        "promo_code_id": null,
        "created_at": "2025-03-01T10:00:00Z"
    })
}

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let app = spawn_app(common::config("http://127.0.0.1:1"));

    let response = app.router.oneshot(get("/requests")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    assert_eq!(read_json(response).await["code"], 1002);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_401() {
    let app = spawn_app(common::config("http://127.0.0.1:1"));
    let mut other = app.config.clone();
    other.jwt_secret = "someone-else".into();
    let (token, _) = generate_token(1, false, &other).unwrap();

    let response = app
        .router
        .oneshot(get_with_token("/requests", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authenticated_user_is_resolved_from_cache() {
    let app = spawn_app(common::config("http://127.0.0.1:1"));
    app.seed("user:5", &user(5, 0)).await;
    app.seed("request_list", &vec![order(2), order(1)]).await;
    app.seed("request:2", &order(2)).await;
    let (token, _) = generate_token(5, false, &app.config).unwrap();

    let response = app
        .router
        .clone()
        .oneshot(get_with_token("/requests", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["resp_data"][0]["id"], 2);
    assert_eq!(body["resp_data"][1]["id"], 1);

    let response = app
        .router
        .clone()
        .oneshot(get_with_token("/requests/2", &token))
        .await
        .unwrap();
    assert_eq!(read_json(response).await["resp_data"]["payment_id"], "700");

    let response = app
        .router
        .oneshot(get_with_token("/users/5", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["resp_data"]["email"], "user5@example.com");
    assert!(body["resp_data"].get("password").is_none());
}

#[tokio::test]
async fn non_admin_cannot_create_promo_codes() {
    let app = spawn_app(common::config("http://127.0.0.1:1"));
    app.seed("user:5", &user(5, 0)).await;
    let (token, _) = generate_token(5, false, &app.config).unwrap();

    let mut request = json_request(
        "POST",
        "/promo",
        &json!({
            "user_id": 5,
            "code": "SPRING",
            "discount_type": "percentage",
            "discount_value": 10
        }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );

    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(read_json(response).await["code"], 1003);
}

#[tokio::test]
async fn admin_promo_request_is_validated() {
    let app = spawn_app(common::config("http://127.0.0.1:1"));
    app.seed("user:1", &user(1, 1)).await;
    let (token, _) = generate_token(1, true, &app.config).unwrap();

    let mut request = json_request(
        "POST",
        "/promo",
        &json!({
            "user_id": 1,
            "code": "HALF",
            "discount_type": "percentage",
            "discount_value": 250
        }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );

    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], 1000);
}

#[tokio::test]
async fn registration_rejects_invalid_email() {
    let app = spawn_app(common::config("http://127.0.0.1:1"));

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/users",
            &json!({"email": "nobody", "password": "pw", "first_name": null, "last_name": null, "phone": null}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
