//! Durable event persistence service.
//!
//! [`EventPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and writes every received [`PlatformEvent`] to the
//! `events` table, giving operators an audit trail they can line up with
//! the provider's own delivery logs.

use prepcall_core::types::DbId;
use prepcall_db::repositories::EventRepo;
use prepcall_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::PlatformEvent;

/// Background service that persists platform events to the database.
pub struct EventPersistence;

impl EventPersistence {
    /// Drain the bus into the `events` table until the channel closes.
    ///
    /// Spawn this once at startup with a receiver from
    /// [`EventBus::subscribe`](crate::bus::EventBus::subscribe). Dropping
    /// the bus closes the channel and ends the loop, which is how shutdown
    /// is signalled.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            let event = match receiver.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "event persistence fell behind the bus");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            if let Err(e) = Self::persist(&pool, &event).await {
                tracing::error!(
                    error = %e,
                    event_type = %event.event_type,
                    "failed to persist event"
                );
            }
        }

        tracing::info!("event bus closed, persistence loop exiting");
    }

    async fn persist(pool: &DbPool, event: &PlatformEvent) -> Result<DbId, sqlx::Error> {
        EventRepo::insert(
            pool,
            &event.event_type,
            event.session_id,
            event.external_call_id.as_deref(),
            event.actor_user_id,
            &event.payload,
        )
        .await
    }
}
