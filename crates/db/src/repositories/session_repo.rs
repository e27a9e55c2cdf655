//! Repository for the `interview_sessions` table.
//!
//! Webhook-driven transitions are guarded conditional UPDATEs keyed by
//! `external_call_id`: a duplicate or out-of-order delivery simply matches
//! zero rows and returns `None`. Set-once columns go through COALESCE so a
//! replay can never overwrite the first delivered value. This keeps every
//! transition idempotent and monotonic without explicit locking.

use prepcall_core::session::SessionStatus;
use prepcall_core::types::{DbId, SessionId};
use sqlx::PgPool;

use crate::models::session::{CreateSession, InterviewSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, user_id, external_call_id, status, \
    started_at, ended_at, actual_duration_seconds, transcript, analysis, \
    created_at, updated_at";

/// Maximum page size for session listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for session listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD and lifecycle operations for interview sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session in `created` status, returning the full row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSession,
    ) -> Result<InterviewSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO interview_sessions (user_id, external_call_id, status) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InterviewSession>(&query)
            .bind(input.user_id)
            .bind(&input.external_call_id)
            .bind(SessionStatus::Created.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a session by its internal id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: SessionId,
    ) -> Result<Option<InterviewSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM interview_sessions WHERE id = $1");
        sqlx::query_as::<_, InterviewSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a session by internal id, requiring ownership.
    ///
    /// Returns `None` both when the session does not exist and when it
    /// belongs to another user, so callers cannot tell the two apart.
    pub async fn find_owned(
        pool: &PgPool,
        id: SessionId,
        user_id: DbId,
    ) -> Result<Option<InterviewSession>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM interview_sessions WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, InterviewSession>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a session by the provider's call id.
    pub async fn find_by_external_call_id(
        pool: &PgPool,
        external_call_id: &str,
    ) -> Result<Option<InterviewSession>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM interview_sessions WHERE external_call_id = $1");
        sqlx::query_as::<_, InterviewSession>(&query)
            .bind(external_call_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's sessions newest-first with pagination.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<InterviewSession>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = offset.unwrap_or(0).max(0);
        let query = format!(
            "SELECT {COLUMNS} FROM interview_sessions \
             WHERE user_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, InterviewSession>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply the `created → started` transition.
    ///
    /// Returns the updated row, or `None` when no session matches the call
    /// id in `created` status (unknown call, duplicate, or late delivery).
    pub async fn mark_started(
        pool: &PgPool,
        external_call_id: &str,
    ) -> Result<Option<InterviewSession>, sqlx::Error> {
        let query = format!(
            "UPDATE interview_sessions \
             SET status = $2, \
                 started_at = COALESCE(started_at, NOW()), \
                 updated_at = NOW() \
             WHERE external_call_id = $1 AND status = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InterviewSession>(&query)
            .bind(external_call_id)
            .bind(SessionStatus::Started.as_str())
            .bind(SessionStatus::Created.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Apply the `created/started → completed` transition.
    ///
    /// Accepting `created` as a source keeps the machine order-tolerant
    /// when `call_ended` overtakes `call_started` on the wire. Duration
    /// and transcript keep their first delivered values on replay.
    pub async fn mark_completed(
        pool: &PgPool,
        external_call_id: &str,
        duration_seconds: Option<i32>,
        transcript: Option<&str>,
    ) -> Result<Option<InterviewSession>, sqlx::Error> {
        let query = format!(
            "UPDATE interview_sessions \
             SET status = $2, \
                 ended_at = COALESCE(ended_at, NOW()), \
                 actual_duration_seconds = COALESCE(actual_duration_seconds, $3), \
                 transcript = COALESCE(transcript, $4), \
                 updated_at = NOW() \
             WHERE external_call_id = $1 AND status IN ($5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InterviewSession>(&query)
            .bind(external_call_id)
            .bind(SessionStatus::Completed.as_str())
            .bind(duration_seconds)
            .bind(transcript)
            .bind(SessionStatus::Created.as_str())
            .bind(SessionStatus::Started.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Attach analysis delivered by the provider, keyed by call id.
    ///
    /// Deliberately status-independent: `call_analyzed` may overtake
    /// `call_ended`, and the provider may re-run analysis, so the column
    /// is re-settable.
    pub async fn set_analysis_by_call_id(
        pool: &PgPool,
        external_call_id: &str,
        analysis: &serde_json::Value,
    ) -> Result<Option<InterviewSession>, sqlx::Error> {
        let query = format!(
            "UPDATE interview_sessions \
             SET analysis = $2, updated_at = NOW() \
             WHERE external_call_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InterviewSession>(&query)
            .bind(external_call_id)
            .bind(analysis)
            .fetch_optional(pool)
            .await
    }

    /// Store an evaluation result on a session, keyed by internal id.
    ///
    /// Re-settable: manual re-evaluation overwrites the previous result.
    pub async fn set_analysis(
        pool: &PgPool,
        id: SessionId,
        analysis: &serde_json::Value,
    ) -> Result<Option<InterviewSession>, sqlx::Error> {
        let query = format!(
            "UPDATE interview_sessions \
             SET analysis = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InterviewSession>(&query)
            .bind(id)
            .bind(analysis)
            .fetch_optional(pool)
            .await
    }
}
