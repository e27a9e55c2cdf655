//! Repository for the append-only `events` audit table.

use prepcall_core::types::{DbId, SessionId};
use sqlx::PgPool;

use crate::models::event::Event;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, event_type, session_id, external_call_id, actor_user_id, payload, created_at";

/// Provides read/write operations for audit events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event row, returning the generated id.
    pub async fn insert(
        pool: &PgPool,
        event_type: &str,
        session_id: Option<SessionId>,
        external_call_id: Option<&str>,
        actor_user_id: Option<DbId>,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO events \
                (event_type, session_id, external_call_id, actor_user_id, payload) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(event_type)
        .bind(session_id)
        .bind(external_call_id)
        .bind(actor_user_id)
        .bind(payload)
        .fetch_one(pool)
        .await
    }

    /// List recent events newest-first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List every event recorded for one session, oldest-first.
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: SessionId,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events WHERE session_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }
}
