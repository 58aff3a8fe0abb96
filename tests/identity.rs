mod common;

use ella_rises::database::participant_repo;
use ella_rises::models::Role;
use ella_rises::services::error::ServiceError;
use ella_rises::services::identity_service::{self, NewParticipantInput};

use common::{seed_participant, test_pool};

#[tokio::test]
async fn next_id_is_one_on_an_empty_collection() {
    let pool = test_pool().await;
    let next = participant_repo::next_participant_id(&pool).await.unwrap();
    assert_eq!(next, 1);
}

#[tokio::test]
async fn next_id_is_max_plus_one_regardless_of_gaps() {
    let pool = test_pool().await;
    for id in [1, 2, 5] {
        participant_repo::insert(
            &pool,
            participant_repo::NewParticipant {
                participant_id: id,
                email: &format!("p{}@example.org", id),
                password: None,
                first_name: None,
                last_name: None,
                phone: None,
                city: None,
                state: None,
                zip: None,
                role: Role::Participant.as_str(),
            },
        )
        .await
        .unwrap();
    }

    let next = participant_repo::next_participant_id(&pool).await.unwrap();
    assert_eq!(next, 6);
}

#[tokio::test]
async fn resolve_or_create_is_idempotent_per_email() {
    let pool = test_pool().await;

    let mut tx = pool.begin().await.unwrap();
    let first = identity_service::resolve_or_create_participant(
        &mut tx,
        "donor@example.org",
        Some("Dana"),
        Some("Donor"),
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let second = identity_service::resolve_or_create_participant(
        &mut tx,
        "donor@example.org",
        Some("Different"),
        Some("Name"),
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(first, second);

    // Exactly one row, and the stored names were never overwritten.
    let row = participant_repo::load_by_email(&pool, "donor@example.org")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.first_name.as_deref(), Some("Dana"));
    assert_eq!(row.role, "donor");
    assert!(row.password.is_none());

    let next = participant_repo::next_participant_id(&pool).await.unwrap();
    assert_eq!(next, first + 1);
}

#[tokio::test]
async fn duplicate_email_signup_is_a_conflict() {
    let pool = test_pool().await;
    seed_participant(&pool, "taken@example.org", Role::Participant).await;

    let result = identity_service::create_participant(
        &pool,
        NewParticipantInput {
            email: "taken@example.org",
            password: Some("other"),
            first_name: None,
            last_name: None,
            phone: None,
            city: None,
            state: None,
            zip: None,
            role: Role::Participant,
        },
    )
    .await;

    assert!(matches!(result, Err(ServiceError::Conflict(_))));
}

#[tokio::test]
async fn authenticate_compares_the_stored_credential() {
    let pool = test_pool().await;
    seed_participant(&pool, "p@example.org", Role::Participant).await;

    let ok = identity_service::authenticate(&pool, "p@example.org", "secret")
        .await
        .unwrap();
    assert!(ok.is_some());

    let wrong = identity_service::authenticate(&pool, "p@example.org", "wrong")
        .await
        .unwrap();
    assert!(wrong.is_none());

    let unknown = identity_service::authenticate(&pool, "nobody@example.org", "secret")
        .await
        .unwrap();
    assert!(unknown.is_none());
}

#[tokio::test]
async fn donor_identities_cannot_log_in() {
    let pool = test_pool().await;

    let mut tx = pool.begin().await.unwrap();
    identity_service::resolve_or_create_participant(&mut tx, "donor@example.org", None, None)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let result = identity_service::authenticate(&pool, "donor@example.org", "")
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn blank_password_on_profile_edit_keeps_the_credential() {
    let pool = test_pool().await;
    seed_participant(&pool, "p@example.org", Role::Participant).await;

    identity_service::update_profile(
        &pool,
        "p@example.org",
        identity_service::ProfileUpdateInput {
            first_name: Some("Updated"),
            last_name: Some("Person"),
            phone: None,
            city: None,
            state: None,
            zip: None,
            password: Some("   "),
        },
    )
    .await
    .unwrap();

    let row = participant_repo::load_by_email(&pool, "p@example.org")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.first_name.as_deref(), Some("Updated"));
    assert_eq!(row.password.as_deref(), Some("secret"));
}
