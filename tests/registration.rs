mod common;

use ella_rises::database::registration_repo;
use ella_rises::models::Role;
use ella_rises::services::registration_service::{self, RegistrationError};

use common::{seed_occurrence, seed_participant, seed_template, test_pool};

#[tokio::test]
async fn only_the_first_registration_for_a_pair_succeeds() {
    let pool = test_pool().await;
    let participant_id = seed_participant(&pool, "p@example.org", Role::Participant).await;
    let template_id = seed_template(&pool, "Monthly Workshop").await;
    let occurrence_id = seed_occurrence(&pool, template_id, "2030-01-10 18:00:00").await;

    registration_service::register_by_occurrence(&pool, participant_id, occurrence_id)
        .await
        .expect("first registration succeeds");

    let second =
        registration_service::register_by_occurrence(&pool, participant_id, occurrence_id).await;
    assert!(matches!(second, Err(RegistrationError::AlreadyRegistered)));

    // Still exactly one row for the pair.
    let row = registration_repo::find_by_pair(&pool, participant_id, occurrence_id)
        .await
        .unwrap();
    assert!(row.is_some());
}

#[tokio::test]
async fn register_deregister_register_again_succeeds() {
    let pool = test_pool().await;
    let participant_id = seed_participant(&pool, "p@example.org", Role::Participant).await;
    let template_id = seed_template(&pool, "Monthly Workshop").await;
    let occurrence_id = seed_occurrence(&pool, template_id, "2030-01-10 18:00:00").await;

    let registration_id =
        registration_service::register_by_occurrence(&pool, participant_id, occurrence_id)
            .await
            .unwrap();

    let repeat =
        registration_service::register_by_occurrence(&pool, participant_id, occurrence_id).await;
    assert!(matches!(repeat, Err(RegistrationError::AlreadyRegistered)));

    registration_service::deregister_self(&pool, registration_id, participant_id)
        .await
        .expect("owner can deregister");

    registration_service::register_by_occurrence(&pool, participant_id, occurrence_id)
        .await
        .expect("re-registration after deregistration succeeds");
}

#[tokio::test]
async fn registering_for_a_missing_occurrence_is_not_found() {
    let pool = test_pool().await;
    let participant_id = seed_participant(&pool, "p@example.org", Role::Participant).await;

    let result = registration_service::register_by_occurrence(&pool, participant_id, 999).await;
    assert!(matches!(result, Err(RegistrationError::OccurrenceNotFound)));
}

#[tokio::test]
async fn template_registration_picks_the_most_recent_start() {
    let pool = test_pool().await;
    seed_participant(&pool, "p@example.org", Role::Participant).await;
    let template_id = seed_template(&pool, "Monthly Workshop").await;
    seed_occurrence(&pool, template_id, "2030-01-10 18:00:00").await;
    let latest = seed_occurrence(&pool, template_id, "2030-03-10 18:00:00").await;
    seed_occurrence(&pool, template_id, "2030-02-10 18:00:00").await;

    let registration_id =
        registration_service::register_by_template(&pool, "p@example.org", template_id)
            .await
            .unwrap();

    let row = registration_repo::load_by_id(&pool, registration_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.event_occurrence_id, latest);
}

#[tokio::test]
async fn template_registration_breaks_start_ties_by_lowest_id() {
    let pool = test_pool().await;
    seed_participant(&pool, "p@example.org", Role::Participant).await;
    let template_id = seed_template(&pool, "Monthly Workshop").await;
    let first = seed_occurrence(&pool, template_id, "2030-03-10 18:00:00").await;
    seed_occurrence(&pool, template_id, "2030-03-10 18:00:00").await;

    let registration_id =
        registration_service::register_by_template(&pool, "p@example.org", template_id)
            .await
            .unwrap();

    let row = registration_repo::load_by_id(&pool, registration_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.event_occurrence_id, first);
}

#[tokio::test]
async fn template_registration_requires_an_existing_participant() {
    let pool = test_pool().await;
    let template_id = seed_template(&pool, "Monthly Workshop").await;
    seed_occurrence(&pool, template_id, "2030-01-10 18:00:00").await;

    // Unlike the donation path, registration never creates identities.
    let result =
        registration_service::register_by_template(&pool, "nobody@example.org", template_id).await;
    assert!(matches!(result, Err(RegistrationError::ParticipantNotFound)));
}

#[tokio::test]
async fn template_registration_without_occurrences_reports_no_date() {
    let pool = test_pool().await;
    seed_participant(&pool, "p@example.org", Role::Participant).await;
    let template_id = seed_template(&pool, "Monthly Workshop").await;

    let result =
        registration_service::register_by_template(&pool, "p@example.org", template_id).await;
    assert!(matches!(result, Err(RegistrationError::NoOccurrenceAvailable)));
}

#[tokio::test]
async fn deregistration_is_scoped_to_the_owning_participant() {
    let pool = test_pool().await;
    let owner = seed_participant(&pool, "owner@example.org", Role::Participant).await;
    let other = seed_participant(&pool, "other@example.org", Role::Participant).await;
    let template_id = seed_template(&pool, "Monthly Workshop").await;
    let occurrence_id = seed_occurrence(&pool, template_id, "2030-01-10 18:00:00").await;

    let registration_id =
        registration_service::register_by_occurrence(&pool, owner, occurrence_id)
            .await
            .unwrap();

    // A different participant cannot remove the record by guessing its id.
    let result = registration_service::deregister_self(&pool, registration_id, other).await;
    assert!(result.is_err());

    let row = registration_repo::find_by_pair(&pool, owner, occurrence_id)
        .await
        .unwrap();
    assert!(row.is_some());
}

#[tokio::test]
async fn upcoming_and_past_partitions_split_on_now() {
    let pool = test_pool().await;
    let participant_id = seed_participant(&pool, "p@example.org", Role::Participant).await;
    let template_id = seed_template(&pool, "Monthly Workshop").await;
    let future = seed_occurrence(&pool, template_id, "2099-01-10 18:00:00").await;
    let past = seed_occurrence(&pool, template_id, "2001-01-10 18:00:00").await;

    registration_service::register_by_occurrence(&pool, participant_id, future)
        .await
        .unwrap();
    registration_service::register_by_occurrence(&pool, participant_id, past)
        .await
        .unwrap();

    let upcoming = registration_service::upcoming_for_participant(&pool, participant_id)
        .await
        .unwrap();
    let past_rows = registration_service::past_for_participant(&pool, participant_id)
        .await
        .unwrap();

    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].starts_at, "2099-01-10 18:00:00");
    assert_eq!(past_rows.len(), 1);
    assert_eq!(past_rows[0].starts_at, "2001-01-10 18:00:00");
}
