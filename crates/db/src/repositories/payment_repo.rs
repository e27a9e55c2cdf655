//! Repository for the `payments` table.
//!
//! Read-only from this service: rows are written by the payment gateway
//! integration when a checkout completes.

use prepcall_core::types::DbId;
use sqlx::PgPool;

use crate::models::payment::Payment;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, external_payment_id, amount_cents, currency, credits_granted, status, created_at";

/// Maximum page size for payment listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for payment listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides read access to payment records.
pub struct PaymentRepo;

impl PaymentRepo {
    /// List a user's payments newest-first with pagination.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = offset.unwrap_or(0).max(0);
        let query = format!(
            "SELECT {COLUMNS} FROM payments \
             WHERE user_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
