//! Repository for the `profiles` table.

use prepcall_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::Profile;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, interview_credits, created_at, updated_at";

/// Outcome of a credit reservation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditReservation {
    /// One credit was taken; carries the balance left afterwards.
    Reserved { remaining: i32 },
    /// The profile exists but its balance is already zero.
    InsufficientCredits,
    /// No profile row for this user id.
    ProfileMissing,
}

/// Provides operations on user profiles and their credit balances.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Find a profile by user id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically take one credit from a user's balance.
    ///
    /// A single conditional UPDATE: the `interview_credits > 0` predicate
    /// and the row lock it takes mean concurrent reservations can never
    /// drive the balance negative. Zero rows updated means either the
    /// profile is missing or the balance is already zero; a follow-up
    /// SELECT disambiguates the two.
    pub async fn reserve_credit(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<CreditReservation, sqlx::Error> {
        let remaining: Option<i32> = sqlx::query_scalar(
            "UPDATE profiles \
             SET interview_credits = interview_credits - 1, updated_at = NOW() \
             WHERE id = $1 AND interview_credits > 0 \
             RETURNING interview_credits",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        if let Some(remaining) = remaining {
            return Ok(CreditReservation::Reserved { remaining });
        }

        match Self::find_by_id(pool, user_id).await? {
            Some(_) => Ok(CreditReservation::InsufficientCredits),
            None => Ok(CreditReservation::ProfileMissing),
        }
    }

    /// Add credits to a balance, creating the profile row if needed.
    ///
    /// The payment gateway integration is the production caller of this
    /// path; seeds and tests use it to set up balances.
    pub async fn grant_credits(
        pool: &PgPool,
        user_id: DbId,
        credits: i32,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (id, interview_credits) \
             VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE \
             SET interview_credits = profiles.interview_credits + EXCLUDED.interview_credits, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(credits)
            .fetch_one(pool)
            .await
    }
}
