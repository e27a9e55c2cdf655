//! Provider webhook payloads and the closed event union they map onto.
//!
//! The voice-call provider delivers lifecycle callbacks at least once and
//! possibly out of order. Payload fields beyond `event` and `call.call_id`
//! are optional on the wire; missing fields must never fail parsing. The
//! gateway acknowledges every delivery, so mapping a payload onto
//! [`WebhookEvent`] is total: anything unrecognized lands in
//! [`WebhookEvent::Unknown`].

use serde::Deserialize;

use crate::session::compute_duration_seconds;

// ---------------------------------------------------------------------------
// Event name constants
// ---------------------------------------------------------------------------

/// The provider-side call began.
pub const EVENT_CALL_STARTED: &str = "call_started";

/// The call finished; the payload may carry timestamps and a transcript.
pub const EVENT_CALL_ENDED: &str = "call_ended";

/// The provider finished its own post-call analysis.
pub const EVENT_CALL_ANALYZED: &str = "call_analyzed";

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// Raw webhook body: `{ "event": ..., "call": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub event: String,
    #[serde(default)]
    pub call: Option<CallPayload>,
}

/// The `call` object inside a webhook body. Timestamps are epoch
/// milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct CallPayload {
    pub call_id: String,
    #[serde(default)]
    pub start_timestamp: Option<i64>,
    #[serde(default)]
    pub end_timestamp: Option<i64>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub analysis: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Event union
// ---------------------------------------------------------------------------

/// The closed set of provider events this system reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    CallStarted {
        call_id: String,
    },
    CallEnded {
        call_id: String,
        /// Whole seconds derived from the provider timestamps, when both
        /// were present and consistent.
        duration_seconds: Option<i32>,
        transcript: Option<String>,
    },
    CallAnalyzed {
        call_id: String,
        analysis: Option<serde_json::Value>,
    },
    /// Anything else, including recognized event names whose payload is
    /// missing the `call` object needed to correlate it.
    Unknown {
        event: String,
    },
}

impl WebhookEvent {
    /// Map a raw payload onto the event union.
    pub fn from_payload(payload: WebhookPayload) -> WebhookEvent {
        let WebhookPayload { event, call } = payload;
        let Some(call) = call else {
            return WebhookEvent::Unknown { event };
        };
        match event.as_str() {
            EVENT_CALL_STARTED => WebhookEvent::CallStarted {
                call_id: call.call_id,
            },
            EVENT_CALL_ENDED => WebhookEvent::CallEnded {
                duration_seconds: compute_duration_seconds(
                    call.start_timestamp,
                    call.end_timestamp,
                ),
                call_id: call.call_id,
                transcript: call.transcript,
            },
            EVENT_CALL_ANALYZED => WebhookEvent::CallAnalyzed {
                call_id: call.call_id,
                analysis: call.analysis,
            },
            _ => WebhookEvent::Unknown { event },
        }
    }

    /// The event name as delivered on the wire, for logging and the
    /// audit trail.
    pub fn name(&self) -> &str {
        match self {
            WebhookEvent::CallStarted { .. } => EVENT_CALL_STARTED,
            WebhookEvent::CallEnded { .. } => EVENT_CALL_ENDED,
            WebhookEvent::CallAnalyzed { .. } => EVENT_CALL_ANALYZED,
            WebhookEvent::Unknown { event } => event,
        }
    }

    /// The correlation key, when the payload carried one.
    pub fn call_id(&self) -> Option<&str> {
        match self {
            WebhookEvent::CallStarted { call_id }
            | WebhookEvent::CallEnded { call_id, .. }
            | WebhookEvent::CallAnalyzed { call_id, .. } => Some(call_id),
            WebhookEvent::Unknown { .. } => None,
        }
    }
}
