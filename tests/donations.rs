mod common;

use ella_rises::database::participant_repo;
use ella_rises::models::Role;
use ella_rises::services::donation_service;
use ella_rises::services::error::ServiceError;

use common::{seed_participant, test_pool};

#[tokio::test]
async fn donation_from_an_unknown_email_creates_a_donor_identity() {
    let pool = test_pool().await;

    let recorded =
        donation_service::record_public_donation(&pool, "new@x.org", 50.0, Some("New"), Some("Donor"))
            .await
            .unwrap();
    assert_eq!(recorded.donation_no, 1);

    let row = participant_repo::load_by_email(&pool, "new@x.org")
        .await
        .unwrap()
        .expect("donor identity created");
    assert_eq!(row.role, "donor");
    assert!(row.password.is_none());
    assert_eq!(row.participant_id, recorded.participant_id);
}

#[tokio::test]
async fn repeat_donations_reuse_the_identity_and_sum() {
    let pool = test_pool().await;

    let first = donation_service::record_public_donation(&pool, "new@x.org", 50.0, None, None)
        .await
        .unwrap();
    let second = donation_service::record_public_donation(&pool, "new@x.org", 50.0, None, None)
        .await
        .unwrap();

    assert_eq!(first.participant_id, second.participant_id);
    assert_eq!(second.donation_no, 2);

    // One identity, read-after-write total.
    let next = participant_repo::next_participant_id(&pool).await.unwrap();
    assert_eq!(next, first.participant_id + 1);

    let total = donation_service::total_for_participant(&pool, first.participant_id)
        .await
        .unwrap();
    assert_eq!(total, 100.0);
}

#[tokio::test]
async fn donations_from_an_existing_participant_attach_to_it() {
    let pool = test_pool().await;
    let participant_id = seed_participant(&pool, "p@example.org", Role::Participant).await;

    let recorded = donation_service::record_public_donation(
        &pool,
        "p@example.org",
        25.0,
        Some("Other"),
        Some("Name"),
    )
    .await
    .unwrap();
    assert_eq!(recorded.participant_id, participant_id);

    // The existing identity keeps its stored names and role.
    let row = participant_repo::load_by_id(&pool, participant_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.first_name.as_deref(), Some("Test"));
    assert_eq!(row.role, "participant");
}

#[tokio::test]
async fn aggregate_total_is_the_sum_of_all_amounts() {
    let pool = test_pool().await;
    let participant_id = seed_participant(&pool, "p@example.org", Role::Participant).await;

    donation_service::record_admin_donation(&pool, participant_id, 10.0, "2025-01-01")
        .await
        .unwrap();
    donation_service::record_admin_donation(&pool, participant_id, 15.5, "2025-02-01")
        .await
        .unwrap();

    let view = donation_service::load_ledger_view(&pool, "").await.unwrap();
    assert_eq!(view.donations.len(), 2);
    assert_eq!(view.grand_total, 25.5);
}

#[tokio::test]
async fn admin_donations_are_numbered_per_participant() {
    let pool = test_pool().await;
    let a = seed_participant(&pool, "a@example.org", Role::Participant).await;
    let b = seed_participant(&pool, "b@example.org", Role::Participant).await;

    donation_service::record_admin_donation(&pool, a, 10.0, "2025-01-01")
        .await
        .unwrap();
    donation_service::record_admin_donation(&pool, a, 20.0, "2025-02-01")
        .await
        .unwrap();
    let b_donation = donation_service::record_admin_donation(&pool, b, 5.0, "2025-03-01")
        .await
        .unwrap();

    let rows = donation_service::load_ledger_view(&pool, "").await.unwrap().donations;
    let b_row = rows.iter().find(|d| d.donation_id == b_donation).unwrap();
    assert_eq!(b_row.donation_no, 1);

    let a_numbers: Vec<i64> = rows
        .iter()
        .filter(|d| d.participant_id == a)
        .map(|d| d.donation_no)
        .collect();
    assert!(a_numbers.contains(&1) && a_numbers.contains(&2));
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let pool = test_pool().await;

    let zero = donation_service::record_public_donation(&pool, "d@x.org", 0.0, None, None).await;
    assert!(matches!(zero, Err(ServiceError::Validation(_))));

    // No identity is created for a rejected donation.
    let row = participant_repo::load_by_email(&pool, "d@x.org").await.unwrap();
    assert!(row.is_none());
}
