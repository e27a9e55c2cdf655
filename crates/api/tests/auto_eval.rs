//! Integration tests for the background auto-evaluation worker.
//!
//! These spawn the worker loop directly (the way `main` does) instead of
//! going through the HTTP surface; the webhook-to-bus side is covered by
//! the webhook suite.

use std::sync::Arc;
use std::time::Duration;

use prepcall_api::background;
use prepcall_core::types::SessionId;
use prepcall_db::models::session::CreateSession;
use prepcall_db::repositories::{ProfileRepo, SessionRepo};
use prepcall_evaluation::{EvaluationPipeline, LexicalScorer};
use prepcall_events::bus::{PlatformEvent, SESSION_EVALUATED};
use prepcall_events::EventBus;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

const TRANSCRIPT: &str = "Q: What does the borrow checker enforce?\n\
    A: It enforces aliasing rules so mutable access stays exclusive.";

async fn seed_completed(pool: &PgPool, call_id: &str, transcript: Option<&str>) -> SessionId {
    ProfileRepo::grant_credits(pool, 1, 0)
        .await
        .expect("profile seeding should succeed");
    let session = SessionRepo::create(
        pool,
        &CreateSession {
            user_id: 1,
            external_call_id: call_id.to_string(),
        },
    )
    .await
    .expect("session seeding should succeed");
    SessionRepo::mark_completed(pool, call_id, Some(60), transcript)
        .await
        .expect("completion should succeed")
        .expect("completion should match the seeded row");
    session.id
}

/// Spawn the worker exactly the way the binary does.
fn spawn_worker(
    pool: PgPool,
    bus: &Arc<EventBus>,
) -> (CancellationToken, tokio::task::JoinHandle<()>) {
    let pipeline = Arc::new(EvaluationPipeline::new(
        pool.clone(),
        Arc::new(LexicalScorer),
    ));
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(background::auto_eval::run(
        pool,
        pipeline,
        Arc::clone(bus),
        bus.subscribe(),
        cancel.clone(),
    ));
    (cancel, handle)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn worker_evaluates_completed_session(pool: PgPool) {
    let session_id = seed_completed(&pool, "auto-call-1", Some(TRANSCRIPT)).await;

    let bus = Arc::new(EventBus::default());
    let mut follow_up = bus.subscribe();
    let (cancel, handle) = spawn_worker(pool.clone(), &bus);

    bus.publish(PlatformEvent::session_completed(
        session_id,
        "auto-call-1",
        true,
    ));

    // The worker announces success on the bus; wait for that rather than
    // polling the table.
    let evaluated = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = follow_up.recv().await.expect("bus should stay open");
            if event.event_type == SESSION_EVALUATED {
                break event;
            }
        }
    })
    .await
    .expect("worker should evaluate within the timeout");
    assert_eq!(evaluated.session_id, Some(session_id));
    assert_eq!(evaluated.payload["trigger"], "auto");

    // Persistence happens before the announcement, so this read is safe.
    let session = SessionRepo::find_by_id(&pool, session_id)
        .await
        .expect("session lookup should succeed")
        .expect("session should exist");
    let analysis = session.analysis.expect("analysis should be persisted");
    assert_eq!(analysis["question_count"], 1);

    cancel.cancel();
    let _ = handle.await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn worker_skips_session_without_transcript(pool: PgPool) {
    let session_id = seed_completed(&pool, "auto-call-2", None).await;

    let bus = Arc::new(EventBus::default());
    let (cancel, handle) = spawn_worker(pool.clone(), &bus);

    bus.publish(PlatformEvent::session_completed(
        session_id,
        "auto-call-2",
        false,
    ));

    // Give the worker time to mishandle the event before checking that
    // nothing was written.
    tokio::time::sleep(Duration::from_millis(300)).await;

    let session = SessionRepo::find_by_id(&pool, session_id)
        .await
        .expect("session lookup should succeed")
        .expect("session should exist");
    assert!(session.analysis.is_none());

    cancel.cancel();
    let _ = handle.await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn worker_ignores_unrelated_events(pool: PgPool) {
    let session_id = seed_completed(&pool, "auto-call-3", Some(TRANSCRIPT)).await;

    let bus = Arc::new(EventBus::default());
    let (cancel, handle) = spawn_worker(pool.clone(), &bus);

    // Started/analyzed events must not trigger evaluation.
    bus.publish(PlatformEvent::session_started(session_id, "auto-call-3"));
    bus.publish(PlatformEvent::session_analyzed(session_id, "auto-call-3"));

    tokio::time::sleep(Duration::from_millis(300)).await;

    let session = SessionRepo::find_by_id(&pool, session_id)
        .await
        .expect("session lookup should succeed")
        .expect("session should exist");
    assert!(session.analysis.is_none());

    cancel.cancel();
    let _ = handle.await;
}
