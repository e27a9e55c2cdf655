//! In-process publish/subscribe for session lifecycle events.
//!
//! One `Arc<EventBus>` is shared across the application; the webhook
//! gateway and handlers publish [`PlatformEvent`]s into it, and the
//! persistence and auto-evaluation workers consume them independently.

use chrono::{DateTime, Utc};
use prepcall_core::types::{DbId, SessionId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event type names
// ---------------------------------------------------------------------------

/// A session row was created after a successful credit reservation.
pub const SESSION_CREATED: &str = "session.created";

/// The provider reported the call began (`call_started` applied).
pub const SESSION_STARTED: &str = "session.started";

/// The provider reported the call finished (`call_ended` applied). The
/// auto-evaluation worker reacts to this one.
pub const SESSION_COMPLETED: &str = "session.completed";

/// Provider-side analysis was attached (`call_analyzed` applied).
pub const SESSION_ANALYZED: &str = "session.analyzed";

/// The evaluation pipeline persisted a result for the session.
pub const SESSION_EVALUATED: &str = "session.evaluated";

/// A webhook delivery was acknowledged without changing any session:
/// unknown event name, unknown call id, or a stale duplicate.
pub const WEBHOOK_IGNORED: &str = "webhook.ignored";

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A lifecycle event that occurred on the platform.
///
/// Constructed via the named constructors below, or via
/// [`PlatformEvent::new`] plus the `with_*` builder methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `"session.completed"`.
    pub event_type: String,

    /// The session this event concerns, when one matched.
    pub session_id: Option<SessionId>,

    /// The provider call id carried by the triggering delivery.
    pub external_call_id: Option<String>,

    /// The user that triggered the event, for user-initiated actions.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            session_id: None,
            external_call_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the session the event concerns.
    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Attach the provider call id.
    pub fn with_call(mut self, external_call_id: impl Into<String>) -> Self {
        self.external_call_id = Some(external_call_id.into());
        self
    }

    /// Attach the acting user.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    // -- Named constructors for the lifecycle moments ------------------------

    /// A session was created for `user_id` after reserving a credit.
    pub fn session_created(session_id: SessionId, external_call_id: &str, user_id: DbId) -> Self {
        Self::new(SESSION_CREATED)
            .with_session(session_id)
            .with_call(external_call_id)
            .with_actor(user_id)
    }

    /// `call_started` moved the session to `started`.
    pub fn session_started(session_id: SessionId, external_call_id: &str) -> Self {
        Self::new(SESSION_STARTED)
            .with_session(session_id)
            .with_call(external_call_id)
    }

    /// `call_ended` moved the session to `completed`.
    pub fn session_completed(
        session_id: SessionId,
        external_call_id: &str,
        has_transcript: bool,
    ) -> Self {
        Self::new(SESSION_COMPLETED)
            .with_session(session_id)
            .with_call(external_call_id)
            .with_payload(serde_json::json!({ "has_transcript": has_transcript }))
    }

    /// `call_analyzed` attached provider analysis to the session.
    pub fn session_analyzed(session_id: SessionId, external_call_id: &str) -> Self {
        Self::new(SESSION_ANALYZED)
            .with_session(session_id)
            .with_call(external_call_id)
    }

    /// The evaluation pipeline persisted a result.
    pub fn session_evaluated(session_id: SessionId, trigger: &str) -> Self {
        Self::new(SESSION_EVALUATED)
            .with_session(session_id)
            .with_payload(serde_json::json!({ "trigger": trigger }))
    }

    /// A delivery was acknowledged without touching any session.
    pub fn webhook_ignored(event_name: &str, external_call_id: Option<&str>, reason: &str) -> Self {
        let event = Self::new(WEBHOOK_IGNORED).with_payload(serde_json::json!({
            "event": event_name,
            "reason": reason,
        }));
        match external_call_id {
            Some(call_id) => event.with_call(call_id),
            None => event,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Buffer size used by [`EventBus::default`]. A receiver that falls more
/// than this many events behind starts seeing `RecvError::Lagged`.
const DEFAULT_BUS_CAPACITY: usize = 1024;

/// Fan-out hub for [`PlatformEvent`]s.
///
/// Every subscriber gets its own copy of every event published after it
/// subscribed. Dropping the bus closes the channel, which consumers treat
/// as the shutdown signal.
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

impl EventBus {
    /// Create a bus whose channel buffers up to `capacity` events per
    /// subscriber before lagging kicks in.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: PlatformEvent) {
        // A SendError only means nobody is subscribed right now; events are
        // not buffered for future subscribers.
        let _ = self.sender.send(event);
    }

    /// Open a new subscription receiving every event from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
