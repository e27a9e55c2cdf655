//! Repository layer.
//!
//! Repositories are zero-sized structs whose async methods take `&PgPool`
//! as their first argument; none of them hold state or a connection.

pub mod event_repo;
pub mod payment_repo;
pub mod profile_repo;
pub mod session_repo;

pub use event_repo::EventRepo;
pub use payment_repo::PaymentRepo;
pub use profile_repo::{CreditReservation, ProfileRepo};
pub use session_repo::SessionRepo;
