//! Prepcall event bus and audit persistence.
//!
//! Building blocks for the in-process lifecycle event system:
//!
//! - [`EventBus`] — publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] — the canonical lifecycle event envelope.
//! - [`EventPersistence`] — background service that durably writes every
//!   event to the `events` table for correlation with provider-side logs.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use persistence::EventPersistence;
