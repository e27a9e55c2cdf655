//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus a create DTO where inserts take more than a
//! couple of fields.

pub mod event;
pub mod payment;
pub mod profile;
pub mod session;
