//! Integration tests for the credit ledger.
//!
//! The invariant under test: a balance is never observed negative, even
//! when reservations race, because the decrement is a single conditional
//! UPDATE rather than a read-then-write.

use prepcall_db::repositories::{CreditReservation, ProfileRepo};
use sqlx::PgPool;

const USER_ID: i64 = 101;

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserve_decrements_and_reports_remaining(pool: PgPool) {
    ProfileRepo::grant_credits(&pool, USER_ID, 3).await.unwrap();

    let outcome = ProfileRepo::reserve_credit(&pool, USER_ID).await.unwrap();
    assert_eq!(outcome, CreditReservation::Reserved { remaining: 2 });

    let profile = ProfileRepo::find_by_id(&pool, USER_ID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.interview_credits, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserve_with_zero_balance_is_insufficient(pool: PgPool) {
    ProfileRepo::grant_credits(&pool, USER_ID, 0).await.unwrap();

    let outcome = ProfileRepo::reserve_credit(&pool, USER_ID).await.unwrap();
    assert_eq!(outcome, CreditReservation::InsufficientCredits);

    let profile = ProfileRepo::find_by_id(&pool, USER_ID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.interview_credits, 0, "balance must not go negative");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserve_without_profile_reports_missing(pool: PgPool) {
    let outcome = ProfileRepo::reserve_credit(&pool, 424242).await.unwrap();
    assert_eq!(outcome, CreditReservation::ProfileMissing);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn grant_upserts_and_accumulates(pool: PgPool) {
    let first = ProfileRepo::grant_credits(&pool, USER_ID, 2).await.unwrap();
    assert_eq!(first.interview_credits, 2);

    let second = ProfileRepo::grant_credits(&pool, USER_ID, 3).await.unwrap();
    assert_eq!(second.interview_credits, 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_reservations_never_oversell(pool: PgPool) {
    const BALANCE: i32 = 5;
    const ATTEMPTS: usize = 8;

    ProfileRepo::grant_credits(&pool, USER_ID, BALANCE)
        .await
        .unwrap();

    let mut handles = Vec::with_capacity(ATTEMPTS);
    for _ in 0..ATTEMPTS {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            ProfileRepo::reserve_credit(&pool, USER_ID).await.unwrap()
        }));
    }

    let mut reserved = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            CreditReservation::Reserved { remaining } => {
                assert!(remaining >= 0);
                reserved += 1;
            }
            CreditReservation::InsufficientCredits => rejected += 1,
            CreditReservation::ProfileMissing => panic!("profile was seeded"),
        }
    }

    assert_eq!(reserved, BALANCE as usize);
    assert_eq!(rejected, ATTEMPTS - BALANCE as usize);

    let profile = ProfileRepo::find_by_id(&pool, USER_ID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.interview_credits, 0);
}
