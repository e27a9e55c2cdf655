//! Shared helpers for API integration tests.
//!
//! Apps are built through [`build_app_router`] so every test exercises the
//! same middleware stack (CORS, request ID, timeout, tracing, panic
//! recovery) that production uses.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use prepcall_api::auth::jwt::{generate_access_token, JwtConfig};
use prepcall_api::config::ServerConfig;
use prepcall_api::gateway::WebhookGateway;
use prepcall_api::provider_client::PlaceholderProvider;
use prepcall_api::router::build_app_router;
use prepcall_api::state::AppState;
use prepcall_evaluation::{EvaluationPipeline, LexicalScorer};
use prepcall_events::EventBus;

/// Signing secret shared by [`test_config`] and [`auth_token`].
const TEST_JWT_SECRET: &str = "integration-test-secret-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout, and no provider, scorer, or webhook-secret
/// configuration.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
        provider_webhook_secret: None,
        provider_api_url: None,
        provider_api_key: None,
        scorer_api_url: None,
        scorer_api_key: None,
    }
}

/// Build the full application router backed by the given pool.
///
/// Sessions get placeholder call ids and evaluations use the built-in
/// lexical scorer, so tests run hermetically. Webhook signature
/// enforcement is off; use [`build_test_app_with_webhook_secret`] to
/// turn it on.
pub fn build_test_app(pool: PgPool) -> Router {
    app_with_config(pool, test_config())
}

/// Like [`build_test_app`], but with webhook signature enforcement on.
pub fn build_test_app_with_webhook_secret(pool: PgPool, secret: &str) -> Router {
    let mut config = test_config();
    config.provider_webhook_secret = Some(secret.to_string());
    app_with_config(pool, config)
}

fn app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let event_bus = Arc::new(EventBus::default());
    let pipeline = Arc::new(EvaluationPipeline::new(
        pool.clone(),
        Arc::new(LexicalScorer),
    ));
    let gateway = Arc::new(WebhookGateway::new(
        pool.clone(),
        Arc::clone(&event_bus),
        config.provider_webhook_secret.clone(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
        gateway,
        provider: Arc::new(PlaceholderProvider),
        pipeline,
    };

    build_app_router(state, &config)
}

/// Mint a valid access token for the given user id.
pub fn auth_token(user_id: i64) -> String {
    let config = test_config();
    generate_access_token(user_id, &config.jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request with no Authorization header.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and no Authorization header.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a raw webhook delivery, optionally carrying an
/// `x-provider-signature` header.
pub async fn post_webhook(
    app: Router,
    uri: &str,
    body: Vec<u8>,
    signature: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(sig) = signature {
        builder = builder.header("x-provider-signature", sig);
    }
    let request = builder.body(Body::from(body)).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
