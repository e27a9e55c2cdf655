//! Background auto-evaluation of completed sessions.
//!
//! Subscribes to the event bus and evaluates a session's transcript as soon
//! as its `call_ended` webhook lands, so most users never need the manual
//! trigger. Best-effort by design: failures are logged and left for the
//! manual path, which produces the identical result for an unchanged
//! transcript.

use std::sync::Arc;

use prepcall_core::session::SessionStatus;
use prepcall_db::repositories::SessionRepo;
use prepcall_db::DbPool;
use prepcall_evaluation::EvaluationPipeline;
use prepcall_events::bus::{PlatformEvent, SESSION_COMPLETED};
use prepcall_events::EventBus;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tokio_util::sync::CancellationToken;

/// Run the auto-evaluation loop until `cancel` triggers or the bus closes.
pub async fn run(
    pool: DbPool,
    pipeline: Arc<EvaluationPipeline>,
    bus: Arc<EventBus>,
    mut receiver: Receiver<PlatformEvent>,
    cancel: CancellationToken,
) {
    tracing::info!("Auto-evaluation worker started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Auto-evaluation worker stopping");
                break;
            }
            received = receiver.recv() => match received {
                Ok(event) if event.event_type == SESSION_COMPLETED => {
                    evaluate_completed(&pool, &pipeline, &bus, &event).await;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    // Sessions completed during the gap stay unevaluated
                    // until their owner uses the manual trigger.
                    tracing::warn!(skipped, "Auto-evaluation worker lagged behind the bus");
                }
                Err(RecvError::Closed) => {
                    tracing::info!("Event bus closed; auto-evaluation worker exiting");
                    break;
                }
            }
        }
    }
}

/// Evaluate one completed session, best-effort.
async fn evaluate_completed(
    pool: &DbPool,
    pipeline: &EvaluationPipeline,
    bus: &EventBus,
    event: &PlatformEvent,
) {
    let Some(session_id) = event.session_id else {
        return;
    };

    // Re-read the row rather than trusting the bus payload: the event only
    // says a transcript existed at publish time.
    let session = match SessionRepo::find_by_id(pool, session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            tracing::warn!(%session_id, "completed session vanished before evaluation");
            return;
        }
        Err(e) => {
            tracing::error!(%session_id, error = %e, "failed to load session for auto-evaluation");
            return;
        }
    };

    if SessionStatus::parse(&session.status) != Some(SessionStatus::Completed) {
        return;
    }
    let Some(transcript) = session
        .transcript
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    else {
        tracing::info!(%session_id, "session completed without transcript; skipping auto-evaluation");
        return;
    };

    match pipeline.evaluate(session.id, transcript).await {
        Ok(result) => {
            tracing::info!(
                %session_id,
                average_score = result.average_score,
                "auto-evaluation completed"
            );
            bus.publish(PlatformEvent::session_evaluated(session.id, "auto"));
        }
        Err(e) => {
            tracing::error!(%session_id, error = %e, "auto-evaluation failed; manual trigger available");
        }
    }
}
