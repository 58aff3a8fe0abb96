use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;

use crate::database::{event_occurrence_repo, participant_repo, registration_repo};
use crate::models::RegistrationWithEventRow;
use crate::services::error::is_unique_violation;

/// Failure modes of the registration ledger. Routes map these onto the
/// `?msg=` codes the event pages display.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("participant record not found")]
    ParticipantNotFound,
    #[error("event occurrence not found")]
    OccurrenceNotFound,
    #[error("registration record not found")]
    RegistrationNotFound,
    #[error("no occurrence scheduled for this event")]
    NoOccurrenceAvailable,
    #[error("already registered for this occurrence")]
    AlreadyRegistered,
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

/// Registers a participant for a concrete occurrence.
///
/// The existence check, the identifier allocation and the insert run in one
/// transaction; the schema's UNIQUE(participant, occurrence) backstop turns
/// a lost race into the same `AlreadyRegistered` outcome.
pub async fn register_by_occurrence(
    pool: &SqlitePool,
    participant_id: i64,
    occurrence_id: i64,
) -> Result<i64, RegistrationError> {
    let mut tx = pool.begin().await?;

    if event_occurrence_repo::load_by_id(&mut *tx, occurrence_id)
        .await?
        .is_none()
    {
        return Err(RegistrationError::OccurrenceNotFound);
    }

    let registration_id = insert_registration(&mut tx, participant_id, occurrence_id).await?;
    tx.commit().await?;
    Ok(registration_id)
}

/// Registers the participant behind `email` for the most recently starting
/// occurrence of the template. The participant must already exist; this
/// path never creates identities. Among occurrences sharing the latest
/// start, the lowest identifier wins.
pub async fn register_by_template(
    pool: &SqlitePool,
    email: &str,
    template_id: i64,
) -> Result<i64, RegistrationError> {
    let mut tx = pool.begin().await?;

    let Some(participant) = participant_repo::load_by_email(&mut *tx, email).await? else {
        return Err(RegistrationError::ParticipantNotFound);
    };

    let Some(occurrence) = event_occurrence_repo::latest_for_template(&mut *tx, template_id).await?
    else {
        return Err(RegistrationError::NoOccurrenceAvailable);
    };

    let registration_id = insert_registration(
        &mut tx,
        participant.participant_id,
        occurrence.event_occurrence_id,
    )
    .await?;
    tx.commit().await?;
    Ok(registration_id)
}

async fn insert_registration(
    conn: &mut SqliteConnection,
    participant_id: i64,
    occurrence_id: i64,
) -> Result<i64, RegistrationError> {
    if registration_repo::find_by_pair(&mut *conn, participant_id, occurrence_id)
        .await?
        .is_some()
    {
        return Err(RegistrationError::AlreadyRegistered);
    }

    let registration_id = registration_repo::next_registration_id(&mut *conn).await?;
    match registration_repo::insert(&mut *conn, registration_id, participant_id, occurrence_id)
        .await
    {
        Ok(_) => Ok(registration_id),
        Err(e) if is_unique_violation(&e) => Err(RegistrationError::AlreadyRegistered),
        Err(e) => Err(e.into()),
    }
}

/// Removes a registration owned by the acting participant. Rows belonging
/// to someone else are invisible to this call.
pub async fn deregister_self(
    pool: &SqlitePool,
    registration_id: i64,
    acting_participant_id: i64,
) -> Result<(), RegistrationError> {
    let deleted =
        registration_repo::delete_owned(pool, registration_id, acting_participant_id).await?;
    if deleted == 0 {
        return Err(RegistrationError::RegistrationNotFound);
    }
    Ok(())
}

/// Admin variant: the caller supplies the participant the registration is
/// expected to belong to, so a guessed registration id cannot detach another
/// account's record.
pub async fn deregister_admin(
    pool: &SqlitePool,
    registration_id: i64,
    participant_id: i64,
) -> Result<(), RegistrationError> {
    let deleted = registration_repo::delete_owned(pool, registration_id, participant_id).await?;
    if deleted == 0 {
        return Err(RegistrationError::RegistrationNotFound);
    }
    Ok(())
}

pub async fn upcoming_for_participant(
    pool: &SqlitePool,
    participant_id: i64,
) -> sqlx::Result<Vec<RegistrationWithEventRow>> {
    registration_repo::list_upcoming(pool, participant_id).await
}

pub async fn past_for_participant(
    pool: &SqlitePool,
    participant_id: i64,
) -> sqlx::Result<Vec<RegistrationWithEventRow>> {
    registration_repo::list_past(pool, participant_id).await
}
