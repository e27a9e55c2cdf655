//! Audit event model.

use prepcall_core::types::{DbId, SessionId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `events` table.
///
/// `session_id` and `external_call_id` are both optional so provider
/// deliveries that never matched a session still leave a trace.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub event_type: String,
    pub session_id: Option<SessionId>,
    pub external_call_id: Option<String>,
    pub actor_user_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
