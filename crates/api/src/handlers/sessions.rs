//! Handlers for the interview session lifecycle: starting a session and
//! triggering evaluation, plus the listings the frontend needs to find a
//! session id.
//!
//! Starting a session is the only place a credit is spent. The reservation
//! and the session insert are two separate writes: when the provider call
//! or the insert fails after the decrement, the credit is gone. That gap is
//! inherited behavior, kept visible here rather than papered over with a
//! transaction that could not cover the provider call anyway.

use axum::extract::{Path, Query, State};
use axum::Json;
use prepcall_core::error::CoreError;
use prepcall_core::types::SessionId;
use prepcall_db::models::session::{CreateSession, InterviewSession};
use prepcall_db::repositories::{CreditReservation, ProfileRepo, SessionRepo};
use prepcall_evaluation::EvaluationResult;
use prepcall_events::PlatformEvent;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Start session
// ---------------------------------------------------------------------------

/// Response body for a successfully started session.
#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub success: bool,
    pub message: String,
    pub remaining_credits: i32,
}

/// POST /api/interview
///
/// Reserves one credit, registers a call with the voice provider, and
/// inserts the session row in `created` status. The response deliberately
/// carries no session id; the provider drives everything that follows.
pub async fn start(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<StartSessionResponse>> {
    let remaining = match ProfileRepo::reserve_credit(&state.pool, user.user_id).await? {
        CreditReservation::Reserved { remaining } => remaining,
        CreditReservation::InsufficientCredits => {
            return Err(CoreError::InsufficientCredits {
                user_id: user.user_id,
            }
            .into())
        }
        CreditReservation::ProfileMissing => {
            return Err(CoreError::not_found("Profile", user.user_id).into())
        }
    };

    let call = state.provider.register_call(user.user_id).await?;

    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.user_id,
            external_call_id: call.call_id,
        },
    )
    .await?;

    state.event_bus.publish(PlatformEvent::session_created(
        session.id,
        &session.external_call_id,
        user.user_id,
    ));

    tracing::info!(
        user_id = user.user_id,
        session_id = %session.id,
        remaining_credits = remaining,
        "interview session created"
    );

    Ok(Json(StartSessionResponse {
        success: true,
        message: "Interview session created".to_string(),
        remaining_credits: remaining,
    }))
}

// ---------------------------------------------------------------------------
// Manual evaluation
// ---------------------------------------------------------------------------

/// Request body for the manual evaluation trigger.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response body for a completed evaluation.
#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub success: bool,
    pub message: String,
    pub results: EvaluationResult,
}

/// POST /api/interview/evaluate-manual
///
/// Deterministic retry path: evaluating an unchanged transcript again
/// produces the identical result, so users can safely re-trigger after an
/// auto-evaluation failure.
pub async fn evaluate_manual(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<EvaluateRequest>,
) -> AppResult<Json<EvaluateResponse>> {
    let raw_id = input.session_id.unwrap_or_default();
    if raw_id.trim().is_empty() {
        return Err(CoreError::Validation("session_id is required".into()).into());
    }
    let session_id: SessionId = raw_id
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation("session_id must be a UUID".into()))?;

    // Absent and not-owned are indistinguishable to the caller.
    let session = SessionRepo::find_owned(&state.pool, session_id, user.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Session", session_id))?;

    let transcript = session.transcript.as_deref().unwrap_or("");
    if transcript.trim().is_empty() {
        return Err(
            CoreError::Validation("session has no transcript to evaluate".into()).into(),
        );
    }

    let results = state.pipeline.evaluate(session.id, transcript).await?;

    state
        .event_bus
        .publish(PlatformEvent::session_evaluated(session.id, "manual"));

    tracing::info!(
        user_id = user.user_id,
        session_id = %session.id,
        average_score = results.average_score,
        "manual evaluation completed"
    );

    Ok(Json(EvaluateResponse {
        success: true,
        message: "Evaluation completed".to_string(),
        results,
    }))
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/interview/sessions
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<InterviewSession>>>> {
    let sessions =
        SessionRepo::list_by_user(&state.pool, user.user_id, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// GET /api/interview/sessions/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<SessionId>,
) -> AppResult<Json<DataResponse<InterviewSession>>> {
    let session = SessionRepo::find_owned(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Session", id))?;
    Ok(Json(DataResponse { data: session }))
}
