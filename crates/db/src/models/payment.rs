//! Payment record model.

use prepcall_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `payments` table.
///
/// Rows are written by the payment gateway integration; this service only
/// reads them for receipt listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub user_id: DbId,
    pub external_payment_id: String,
    pub amount_cents: i32,
    pub currency: String,
    pub credits_granted: i32,
    pub status: String,
    pub created_at: Timestamp,
}
