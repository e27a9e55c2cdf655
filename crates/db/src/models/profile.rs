//! User profile model.

use prepcall_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `profiles` table.
///
/// `id` is the authenticated principal id (JWT `sub`), so the table has no
/// serial key of its own. The credit balance is constrained non-negative at
/// the schema level.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub interview_credits: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
