//! Interview session model and DTOs.

use prepcall_core::types::{DbId, SessionId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `interview_sessions` table.
///
/// `status` holds one of the values from
/// [`prepcall_core::session::SessionStatus`]; `started_at`, `ended_at`,
/// `actual_duration_seconds` and `transcript` are set once by webhook-driven
/// transitions and stay NULL until the corresponding event lands.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InterviewSession {
    pub id: SessionId,
    pub user_id: DbId,
    pub external_call_id: String,
    pub status: String,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
    pub actual_duration_seconds: Option<i32>,
    pub transcript: Option<String>,
    pub analysis: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new interview session.
pub struct CreateSession {
    pub user_id: DbId,
    pub external_call_id: String,
}
