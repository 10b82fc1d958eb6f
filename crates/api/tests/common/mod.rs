#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use trailhead_api::auth::jwt::{generate_access_token, JwtConfig};
use trailhead_api::config::ServerConfig;
use trailhead_api::router::build_app_router;
use trailhead_api::state::AppState;
use trailhead_db::models::user::CreateUser;
use trailhead_db::repositories::UserRepo;

const TEST_JWT_SECRET: &str = "trailhead-test-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Insert a user with the given role and return its id.
pub async fn create_user(pool: &PgPool, role: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: Some(format!("{role} user")),
            email: None,
            role: Some(role.to_string()),
        },
    )
    .await
    .expect("user insert should succeed")
    .id
}

/// Sign an access token accepted by the test app.
pub fn token(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).expect("token should sign")
}

/// Create a user with `role` and return `(id, bearer token)`.
pub async fn user_with_token(pool: &PgPool, role: &str) -> (i64, String) {
    let id = create_user(pool, role).await;
    (id, token(id, role))
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Send a raw (possibly malformed) JSON body.
pub async fn post_raw_auth(app: Router, uri: &str, body: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Content fixtures, created through the API
// ---------------------------------------------------------------------------

/// Create a path via `POST /creator/paths` and return its id.
pub async fn create_path(pool: &PgPool, token: &str, slug: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/creator/paths",
        serde_json::json!({ "title": format!("Path {slug}"), "slug": slug }),
        token,
    )
    .await;
    assert_eq!(response.status(), 201, "path create should succeed");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

pub async fn create_module(pool: &PgPool, token: &str, path_id: i64, slug: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/creator/paths/{path_id}/modules"),
        serde_json::json!({ "title": format!("Module {slug}"), "slug": slug }),
        token,
    )
    .await;
    assert_eq!(response.status(), 201, "module create should succeed");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

pub async fn create_lesson(pool: &PgPool, token: &str, module_id: i64, slug: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/creator/modules/{module_id}/lessons"),
        serde_json::json!({
            "title": format!("Lesson {slug}"),
            "slug": slug,
            "content_blocks": [
                { "id": "b1", "type": "text", "order": 0, "content": { "html": "<p>hi</p>" } }
            ]
        }),
        token,
    )
    .await;
    assert_eq!(response.status(), 201, "lesson create should succeed");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Publish a path with the given settings.
pub async fn publish(pool: &PgPool, token: &str, path_id: i64, settings: serde_json::Value) {
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/creator/paths/{path_id}/publish"),
        settings,
        token,
    )
    .await;
    assert_eq!(response.status(), 200, "publish should succeed");
}
