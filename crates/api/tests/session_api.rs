//! HTTP-level integration tests for the interview session endpoints:
//! starting a session, listing and fetching sessions, and the profile and
//! payment listings that surround them.

mod common;

use axum::http::StatusCode;
use common::{auth_token, body_json, get, get_auth, post_json_auth};
use prepcall_db::models::session::CreateSession;
use prepcall_db::repositories::{ProfileRepo, SessionRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Seed a session row for `user_id` with the given call id, as if the user
/// had started an interview.
async fn seed_session(
    pool: &PgPool,
    user_id: i64,
    call_id: &str,
) -> prepcall_db::models::session::InterviewSession {
    ProfileRepo::grant_credits(pool, user_id, 0)
        .await
        .expect("profile seeding should succeed");
    SessionRepo::create(
        pool,
        &CreateSession {
            user_id,
            external_call_id: call_id.to_string(),
        },
    )
    .await
    .expect("session seeding should succeed")
}

// ---------------------------------------------------------------------------
// Starting a session
// ---------------------------------------------------------------------------

/// A successful start spends one credit and creates a session row in
/// `created` status with a placeholder call id.
#[sqlx::test(migrations = "../../db/migrations")]
async fn start_session_spends_a_credit(pool: PgPool) {
    ProfileRepo::grant_credits(&pool, 1, 3)
        .await
        .expect("profile seeding should succeed");

    let app = common::build_test_app(pool.clone());
    let token = auth_token(1);
    let response = post_json_auth(app, "/api/interview", serde_json::json!({}), &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Interview session created");
    assert_eq!(json["remaining_credits"], 2);

    // The decrement is visible on the profile row.
    let profile = ProfileRepo::find_by_id(&pool, 1)
        .await
        .expect("profile lookup should succeed")
        .expect("profile should exist");
    assert_eq!(profile.interview_credits, 2);

    // Exactly one session row exists, waiting for the provider.
    let sessions = SessionRepo::list_by_user(&pool, 1, None, None)
        .await
        .expect("session listing should succeed");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].status, "created");
    assert!(sessions[0].external_call_id.starts_with("pending-"));
    assert!(sessions[0].transcript.is_none());
}

/// With a zero balance the start is refused with 403 INSUFFICIENT_CREDITS
/// and the balance stays untouched.
#[sqlx::test(migrations = "../../db/migrations")]
async fn start_with_zero_credits_returns_403(pool: PgPool) {
    ProfileRepo::grant_credits(&pool, 1, 0)
        .await
        .expect("profile seeding should succeed");

    let app = common::build_test_app(pool.clone());
    let token = auth_token(1);
    let response = post_json_auth(app, "/api/interview", serde_json::json!({}), &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_CREDITS");
    assert_eq!(json["error"], "No interview credits remaining");

    let profile = ProfileRepo::find_by_id(&pool, 1)
        .await
        .expect("profile lookup should succeed")
        .expect("profile should exist");
    assert_eq!(profile.interview_credits, 0);
}

/// A caller with no profile row at all gets 404, not 403.
#[sqlx::test(migrations = "../../db/migrations")]
async fn start_without_profile_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = auth_token(42);
    let response = post_json_auth(app, "/api/interview", serde_json::json!({}), &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Profile with id 42 not found");
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Session endpoints require a bearer token.
#[sqlx::test(migrations = "../../db/migrations")]
async fn start_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/interview", serde_json::json!({}), "").await;

    // An empty token fails validation.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_authorization_header_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/interview/sessions").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/interview/sessions", "not-a-real-token").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

// ---------------------------------------------------------------------------
// Listing and fetching sessions
// ---------------------------------------------------------------------------

/// The listing is scoped to the caller; other users' sessions never appear.
#[sqlx::test(migrations = "../../db/migrations")]
async fn list_returns_only_own_sessions(pool: PgPool) {
    seed_session(&pool, 1, "call-own-1").await;
    seed_session(&pool, 1, "call-own-2").await;
    seed_session(&pool, 2, "call-other").await;

    let app = common::build_test_app(pool);
    let token = auth_token(1);
    let response = get_auth(app, "/api/interview/sessions", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let sessions = json["data"].as_array().expect("data should be an array");
    assert_eq!(sessions.len(), 2);
    for session in sessions {
        assert_eq!(session["user_id"], 1);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_respects_pagination(pool: PgPool) {
    for i in 0..3 {
        seed_session(&pool, 1, &format!("call-{i}")).await;
    }

    let app = common::build_test_app(pool.clone());
    let token = auth_token(1);
    let response = get_auth(app, "/api/interview/sessions?limit=2", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/interview/sessions?limit=2&offset=2", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

/// Fetching an owned session returns the full row under `data`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn get_session_returns_owned_row(pool: PgPool) {
    let session = seed_session(&pool, 1, "call-fetch").await;

    let app = common::build_test_app(pool);
    let token = auth_token(1);
    let response = get_auth(app, &format!("/api/interview/sessions/{}", session.id), &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], session.id.to_string());
    assert_eq!(json["data"]["external_call_id"], "call-fetch");
    assert_eq!(json["data"]["status"], "created");
}

/// Another user's session is reported as absent, not forbidden.
#[sqlx::test(migrations = "../../db/migrations")]
async fn get_session_of_another_user_returns_404(pool: PgPool) {
    let session = seed_session(&pool, 2, "call-foreign").await;

    let app = common::build_test_app(pool);
    let token = auth_token(1);
    let response = get_auth(app, &format!("/api/interview/sessions/{}", session.id), &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_with_malformed_id_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = auth_token(1);
    let response = get_auth(app, "/api/interview/sessions/not-a-uuid", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Profile and payments
// ---------------------------------------------------------------------------

/// GET /api/profile returns the caller's credit balance.
#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_returns_credit_balance(pool: PgPool) {
    ProfileRepo::grant_credits(&pool, 1, 5)
        .await
        .expect("profile seeding should succeed");

    let app = common::build_test_app(pool);
    let token = auth_token(1);
    let response = get_auth(app, "/api/profile", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], 1);
    assert_eq!(json["data"]["interview_credits"], 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_profile_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = auth_token(99);
    let response = get_auth(app, "/api/profile", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Profile with id 99 not found");
}

/// GET /api/payments lists the caller's payments newest-first.
#[sqlx::test(migrations = "../../db/migrations")]
async fn payments_list_newest_first(pool: PgPool) {
    ProfileRepo::grant_credits(&pool, 1, 0)
        .await
        .expect("profile seeding should succeed");

    // Rows are written by the payment gateway integration; simulate two
    // checkouts an hour apart.
    sqlx::query(
        "INSERT INTO payments \
         (user_id, external_payment_id, amount_cents, currency, credits_granted, status, created_at) \
         VALUES \
         (1, 'pay_older', 500, 'usd', 5, 'completed', NOW() - INTERVAL '1 hour'), \
         (1, 'pay_newer', 1000, 'usd', 12, 'completed', NOW())",
    )
    .execute(&pool)
    .await
    .expect("payment seeding should succeed");

    let app = common::build_test_app(pool);
    let token = auth_token(1);
    let response = get_auth(app, "/api/payments", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let payments = json["data"].as_array().expect("data should be an array");
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0]["external_payment_id"], "pay_newer");
    assert_eq!(payments[0]["credits_granted"], 12);
    assert_eq!(payments[1]["external_payment_id"], "pay_older");
}
