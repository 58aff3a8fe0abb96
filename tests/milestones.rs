mod common;

use ella_rises::database::participant_milestone_repo;
use ella_rises::models::Role;
use ella_rises::services::error::ServiceError;
use ella_rises::services::milestone_service;

use common::{seed_participant, test_pool};

#[tokio::test]
async fn sequence_numbers_start_at_one_and_increase_per_participant() {
    let pool = test_pool().await;
    let participant_id = seed_participant(&pool, "p@example.org", Role::Participant).await;
    let other = seed_participant(&pool, "q@example.org", Role::Participant).await;
    let milestone_id = milestone_service::create_milestone(&pool, "First Steps")
        .await
        .unwrap();

    for expected in 1..=3 {
        let id = milestone_service::add_achievement(
            &pool,
            participant_id,
            milestone_id,
            Some("2025-01-01"),
        )
        .await
        .unwrap();
        let row = participant_milestone_repo::load_by_id(&pool, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.milestone_no, expected);
    }

    // Another participant's sequence is independent.
    let id = milestone_service::add_achievement(&pool, other, milestone_id, Some("2025-01-01"))
        .await
        .unwrap();
    let row = participant_milestone_repo::load_by_id(&pool, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.milestone_no, 1);
}

#[tokio::test]
async fn deleted_records_never_free_sequence_numbers() {
    let pool = test_pool().await;
    let participant_id = seed_participant(&pool, "p@example.org", Role::Participant).await;
    let milestone_id = milestone_service::create_milestone(&pool, "First Steps")
        .await
        .unwrap();

    let first = milestone_service::add_achievement(
        &pool,
        participant_id,
        milestone_id,
        Some("2025-01-01"),
    )
    .await
    .unwrap();
    milestone_service::add_achievement(&pool, participant_id, milestone_id, Some("2025-02-01"))
        .await
        .unwrap();

    milestone_service::delete_achievement(&pool, first).await.unwrap();

    let third = milestone_service::add_achievement(
        &pool,
        participant_id,
        milestone_id,
        Some("2025-03-01"),
    )
    .await
    .unwrap();
    let row = participant_milestone_repo::load_by_id(&pool, third)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.milestone_no, 3);
}

#[tokio::test]
async fn recording_the_same_milestone_twice_is_allowed() {
    let pool = test_pool().await;
    let participant_id = seed_participant(&pool, "p@example.org", Role::Participant).await;
    let milestone_id = milestone_service::create_milestone(&pool, "First Steps")
        .await
        .unwrap();

    milestone_service::add_achievement(&pool, participant_id, milestone_id, Some("2025-01-01"))
        .await
        .unwrap();
    milestone_service::add_achievement(&pool, participant_id, milestone_id, Some("2025-06-01"))
        .await
        .unwrap();

    let rows = participant_milestone_repo::list_for_participant(&pool, participant_id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn achievements_require_an_existing_milestone() {
    let pool = test_pool().await;
    let participant_id = seed_participant(&pool, "p@example.org", Role::Participant).await;

    let result =
        milestone_service::add_achievement(&pool, participant_id, 42, Some("2025-01-01")).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn milestone_definition_crud_roundtrip() {
    let pool = test_pool().await;

    let id = milestone_service::create_milestone(&pool, "First Steps")
        .await
        .unwrap();
    assert_eq!(id, 1);

    milestone_service::rename_milestone(&pool, id, "First Big Steps")
        .await
        .unwrap();
    let row = milestone_service::load_milestone(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.title, "First Big Steps");

    milestone_service::delete_milestone(&pool, id).await.unwrap();
    assert!(milestone_service::load_milestone(&pool, id)
        .await
        .unwrap()
        .is_none());
}
