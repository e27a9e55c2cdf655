//! Interview session lifecycle.
//!
//! Sessions move `created → started → completed`, driven by provider
//! webhook events. `failed` is representable and terminal but no webhook
//! event transitions into it. The guards that keep transitions monotonic
//! under concurrent or replayed deliveries live in the conditional
//! UPDATE statements of the session repository; the values here must
//! match the `interview_sessions.status` CHECK constraint.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an interview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Created,
    Started,
    Completed,
    Failed,
}

impl SessionStatus {
    /// The string stored in `interview_sessions.status`.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Created => "created",
            SessionStatus::Started => "started",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }

    /// Parse a stored status string. Returns `None` for values outside
    /// the CHECK constraint (only possible if the schema drifted).
    pub fn parse(value: &str) -> Option<SessionStatus> {
        match value {
            "created" => Some(SessionStatus::Created),
            "started" => Some(SessionStatus::Started),
            "completed" => Some(SessionStatus::Completed),
            "failed" => Some(SessionStatus::Failed),
            _ => None,
        }
    }

    /// Terminal states accept no further lifecycle transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Failed)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive a session's duration from the provider's millisecond timestamps.
///
/// Returns whole seconds, rounded down. `None` when either timestamp is
/// missing or the pair is inconsistent (end before start); the column
/// stays NULL rather than recording a bogus value.
pub fn compute_duration_seconds(start_ms: Option<i64>, end_ms: Option<i64>) -> Option<i32> {
    let start = start_ms?;
    let end = end_ms?;
    if end < start {
        return None;
    }
    Some(((end - start) / 1000).min(i32::MAX as i64) as i32)
}
