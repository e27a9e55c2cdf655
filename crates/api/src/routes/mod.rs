pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /interview                    start a session (POST, auth)
/// /interview/evaluate-manual    trigger evaluation (POST, auth)
/// /interview/sessions           list own sessions (GET, auth)
/// /interview/sessions/{id}      get own session (GET, auth)
///
/// /profile                      own profile / credit balance (GET, auth)
/// /payments                     own payments, newest first (GET, auth)
///
/// /provider/webhook             provider event ingestion (POST, signed)
/// /provider/webhook/            same handler; the provider appends a
///                               trailing slash depending on its dashboard
///                               configuration
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/interview", post(handlers::sessions::start))
        .route(
            "/interview/evaluate-manual",
            post(handlers::sessions::evaluate_manual),
        )
        .route("/interview/sessions", get(handlers::sessions::list))
        .route("/interview/sessions/{id}", get(handlers::sessions::get))
        .route("/profile", get(handlers::profile::get))
        .route("/payments", get(handlers::payments::list))
        .route("/provider/webhook", post(handlers::webhooks::provider_webhook))
        .route(
            "/provider/webhook/",
            post(handlers::webhooks::provider_webhook),
        )
}
