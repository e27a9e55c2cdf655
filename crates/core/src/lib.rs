//! Prepcall domain core.
//!
//! Pure domain types and logic shared by every other crate:
//!
//! - [`types`] — id and timestamp aliases used across the workspace.
//! - [`error`] — the [`CoreError`] taxonomy the API layer maps to HTTP.
//! - [`session`] — interview session status machine and derived fields.
//! - [`webhook`] — provider webhook payloads and the closed event union.
//! - [`signature`] — HMAC-SHA256 signing for inbound webhook bodies.
//!
//! This crate has no internal dependencies and performs no I/O.

pub mod error;
pub mod session;
pub mod signature;
pub mod types;
pub mod webhook;

pub use error::CoreError;
