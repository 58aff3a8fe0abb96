use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::database::{participant_repo, session_repo};
use crate::models::{ParticipantRow, Role};
use crate::services::error::{is_unique_violation, ServiceError, ServiceResult};

/// Checks the submitted credentials against the stored ones.
///
/// Credentials are compared as opaque strings; rows without a credential
/// (donor identities) can never log in.
pub async fn authenticate(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> ServiceResult<Option<ParticipantRow>> {
    let Some(participant) = participant_repo::load_by_email(pool, email).await? else {
        return Ok(None);
    };
    match participant.password.as_deref() {
        Some(stored) if stored == password => Ok(Some(participant)),
        _ => Ok(None),
    }
}

/// Opens a session for the participant and returns the opaque session id
/// that goes into the cookie.
pub async fn open_session(pool: &SqlitePool, participant_id: i64) -> ServiceResult<String> {
    let session_id = Uuid::new_v4().to_string();
    session_repo::insert_session(pool, &session_id, participant_id).await?;
    Ok(session_id)
}

pub async fn close_session(pool: &SqlitePool, session_id: &str) -> ServiceResult<()> {
    session_repo::delete_session(pool, session_id).await?;
    Ok(())
}

pub struct NewParticipantInput<'a> {
    pub email: &'a str,
    pub password: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip: Option<&'a str>,
    pub role: Role,
}

/// Creates a participant with a freshly allocated identifier. Used by self
/// sign-up and the admin add forms.
pub async fn create_participant(
    pool: &SqlitePool,
    input: NewParticipantInput<'_>,
) -> ServiceResult<i64> {
    if input.email.trim().is_empty() {
        return Err(ServiceError::Validation("email is required"));
    }

    let mut tx = pool.begin().await?;

    if participant_repo::load_by_email(&mut *tx, input.email)
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict("email already registered"));
    }

    let participant_id = participant_repo::next_participant_id(&mut *tx).await?;
    let inserted = participant_repo::insert(
        &mut *tx,
        participant_repo::NewParticipant {
            participant_id,
            email: input.email,
            password: input.password,
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
            city: input.city,
            state: input.state,
            zip: input.zip,
            role: input.role.as_str(),
        },
    )
    .await;

    match inserted {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(ServiceError::Conflict("email already registered"));
        }
        Err(e) => return Err(e.into()),
    }

    tx.commit().await?;
    Ok(participant_id)
}

pub struct ProfileUpdateInput<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip: Option<&'a str>,
    /// Blank or absent leaves the stored credential untouched.
    pub password: Option<&'a str>,
}

pub async fn update_profile(
    pool: &SqlitePool,
    email: &str,
    input: ProfileUpdateInput<'_>,
) -> ServiceResult<()> {
    let password = input
        .password
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let updated = participant_repo::update_profile(
        pool,
        email,
        participant_repo::ProfileUpdate {
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
            city: input.city,
            state: input.state,
            zip: input.zip,
            password,
        },
    )
    .await?;

    if updated == 0 {
        return Err(ServiceError::NotFound("participant record not found"));
    }
    Ok(())
}

pub async fn delete_participant(pool: &SqlitePool, participant_id: i64) -> ServiceResult<()> {
    let deleted = participant_repo::delete(pool, participant_id).await?;
    if deleted == 0 {
        return Err(ServiceError::NotFound("participant record not found"));
    }
    Ok(())
}

pub async fn list_participants(
    pool: &SqlitePool,
    search: &str,
) -> ServiceResult<Vec<ParticipantRow>> {
    Ok(participant_repo::list(pool, search).await?)
}

pub async fn list_participants_by_first_name(
    pool: &SqlitePool,
) -> ServiceResult<Vec<ParticipantRow>> {
    Ok(participant_repo::list_by_first_name(pool).await?)
}

pub async fn load_participant(
    pool: &SqlitePool,
    participant_id: i64,
) -> ServiceResult<Option<ParticipantRow>> {
    Ok(participant_repo::load_by_id(pool, participant_id).await?)
}

/// Finds the participant owning `email`, or creates a donor identity for it.
///
/// Idempotent per email: a hit returns the existing identifier with the
/// stored names untouched, whatever names the caller supplied. Runs on the
/// caller's transaction so the lookup and the insert commit atomically with
/// the donation that triggered them.
pub async fn resolve_or_create_participant(
    conn: &mut SqliteConnection,
    email: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> ServiceResult<i64> {
    if let Some(existing) = participant_repo::load_by_email(&mut *conn, email).await? {
        return Ok(existing.participant_id);
    }

    let participant_id = participant_repo::next_participant_id(&mut *conn).await?;
    participant_repo::insert(
        &mut *conn,
        participant_repo::NewParticipant {
            participant_id,
            email,
            // Donor identities carry no credential; the donor has to sign up
            // to get a login.
            password: None,
            first_name,
            last_name,
            phone: None,
            city: None,
            state: None,
            zip: None,
            role: Role::Donor.as_str(),
        },
    )
    .await?;

    Ok(participant_id)
}
