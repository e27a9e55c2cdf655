//! Provider webhook ingestion.
//!
//! The gateway turns raw webhook deliveries into session state transitions.
//! Deliveries arrive at least once and possibly out of order, so every
//! branch is idempotent: the repository guards decide whether a delivery
//! changes anything, and the gateway acknowledges either way. Only a
//! storage failure escapes as an error.
//!
//! The gateway is built from its capabilities (pool, bus, optional signing
//! secret) rather than reading ambient state, so tests can construct one
//! with exactly the authority under test.

use std::sync::Arc;

use prepcall_core::signature::verify_webhook_signature;
use prepcall_core::webhook::{
    WebhookEvent, WebhookPayload, EVENT_CALL_ANALYZED, EVENT_CALL_ENDED, EVENT_CALL_STARTED,
};
use prepcall_db::repositories::SessionRepo;
use prepcall_db::DbPool;
use prepcall_events::{EventBus, PlatformEvent};

/// What the HTTP layer should tell the provider about a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// Delivery processed or deliberately ignored; acknowledge with 200.
    Accepted,
    /// Signature enforcement is on and the delivery failed it; reject 401.
    InvalidSignature,
}

/// Webhook ingestion gateway.
pub struct WebhookGateway {
    pool: DbPool,
    bus: Arc<EventBus>,
    /// HMAC secret for `x-provider-signature`. `None` disables enforcement.
    secret: Option<String>,
}

impl WebhookGateway {
    pub fn new(pool: DbPool, bus: Arc<EventBus>, secret: Option<String>) -> Self {
        Self { pool, bus, secret }
    }

    /// Process one raw delivery.
    ///
    /// `signature` is the hex HMAC from the `x-provider-signature` header,
    /// when the provider sent one. Returns `Err` only on storage failure.
    /// Unparseable bodies and unknown events are accepted and logged,
    /// since a provider retry cannot fix them.
    pub async fn process(
        &self,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<GatewayOutcome, sqlx::Error> {
        match &self.secret {
            Some(secret) => {
                let valid = signature
                    .map(|sig| verify_webhook_signature(secret, body, sig))
                    .unwrap_or(false);
                if !valid {
                    tracing::warn!("webhook rejected: missing or invalid signature");
                    return Ok(GatewayOutcome::InvalidSignature);
                }
            }
            None => {
                tracing::warn!(
                    "PROVIDER_WEBHOOK_SECRET not configured; accepting unsigned webhook"
                );
            }
        }

        let payload: WebhookPayload = match serde_json::from_slice(body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed webhook body");
                return Ok(GatewayOutcome::Accepted);
            }
        };

        self.apply(WebhookEvent::from_payload(payload)).await?;
        Ok(GatewayOutcome::Accepted)
    }

    /// Apply one parsed event to the session it correlates with.
    ///
    /// A delivery that matches no row (unknown call id, duplicate, or a
    /// transition the guards already applied) is recorded as ignored.
    async fn apply(&self, event: WebhookEvent) -> Result<(), sqlx::Error> {
        match event {
            WebhookEvent::CallStarted { call_id } => {
                match SessionRepo::mark_started(&self.pool, &call_id).await? {
                    Some(session) => {
                        tracing::info!(session_id = %session.id, call_id, "session started");
                        self.bus
                            .publish(PlatformEvent::session_started(session.id, &call_id));
                    }
                    None => self.ignore(
                        EVENT_CALL_STARTED,
                        Some(&call_id),
                        "no session awaiting start for this call id",
                    ),
                }
            }

            WebhookEvent::CallEnded {
                call_id,
                duration_seconds,
                transcript,
            } => {
                let updated = SessionRepo::mark_completed(
                    &self.pool,
                    &call_id,
                    duration_seconds,
                    transcript.as_deref(),
                )
                .await?;
                match updated {
                    Some(session) => {
                        let has_transcript = session.transcript.is_some();
                        tracing::info!(
                            session_id = %session.id,
                            call_id,
                            duration_seconds,
                            has_transcript,
                            "session completed"
                        );
                        self.bus.publish(PlatformEvent::session_completed(
                            session.id,
                            &call_id,
                            has_transcript,
                        ));
                    }
                    None => self.ignore(
                        EVENT_CALL_ENDED,
                        Some(&call_id),
                        "no open session for this call id",
                    ),
                }
            }

            WebhookEvent::CallAnalyzed { call_id, analysis } => {
                let Some(analysis) = analysis else {
                    self.ignore(
                        EVENT_CALL_ANALYZED,
                        Some(&call_id),
                        "analysis payload missing",
                    );
                    return Ok(());
                };
                match SessionRepo::set_analysis_by_call_id(&self.pool, &call_id, &analysis)
                    .await?
                {
                    Some(session) => {
                        tracing::info!(session_id = %session.id, call_id, "analysis attached");
                        self.bus
                            .publish(PlatformEvent::session_analyzed(session.id, &call_id));
                    }
                    None => self.ignore(
                        EVENT_CALL_ANALYZED,
                        Some(&call_id),
                        "no session for this call id",
                    ),
                }
            }

            WebhookEvent::Unknown { event } => {
                self.ignore(&event, None, "unrecognized event type");
            }
        }
        Ok(())
    }

    fn ignore(&self, event_name: &str, call_id: Option<&str>, reason: &str) {
        tracing::info!(event = event_name, ?call_id, reason, "webhook ignored");
        self.bus
            .publish(PlatformEvent::webhook_ignored(event_name, call_id, reason));
    }
}
