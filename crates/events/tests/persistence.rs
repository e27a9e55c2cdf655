//! Integration test for the event persistence loop.

use prepcall_db::repositories::EventRepo;
use prepcall_events::{bus, EventBus, EventPersistence, PlatformEvent};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn every_published_event_lands_in_the_table(pool: PgPool) {
    let event_bus = EventBus::default();
    let receiver = event_bus.subscribe();

    let session_id = uuid::Uuid::new_v4();
    event_bus.publish(PlatformEvent::session_created(session_id, "call-1", 7));
    event_bus.publish(PlatformEvent::session_completed(session_id, "call-1", true));
    event_bus.publish(PlatformEvent::webhook_ignored(
        "call_transferred",
        Some("call-1"),
        "unrecognized event",
    ));

    // Dropping the bus closes the channel; run() drains what was published
    // and then exits.
    drop(event_bus);
    EventPersistence::run(pool.clone(), receiver).await;

    let rows = EventRepo::list_recent(&pool, 10, 0).await.unwrap();
    assert_eq!(rows.len(), 3);

    let for_session = EventRepo::list_for_session(&pool, session_id).await.unwrap();
    assert_eq!(for_session.len(), 2, "ignored delivery has no session id");
    assert_eq!(for_session[0].event_type, bus::SESSION_CREATED);
    assert_eq!(for_session[0].actor_user_id, Some(7));
    assert_eq!(for_session[1].event_type, bus::SESSION_COMPLETED);
    assert_eq!(for_session[1].payload["has_transcript"], true);
}
