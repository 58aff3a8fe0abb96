use sqlx::{Executor, Sqlite};

use crate::models::{RegistrationRow, RegistrationWithEventRow};

const SQL_NEXT_REGISTRATION_ID: &str = r#"
SELECT COALESCE(MAX(registration_id), 0) + 1 FROM registrations
"#;

const SQL_FIND_BY_PAIR: &str = r#"
SELECT
    registration_id,
    participant_id,
    event_occurrence_id,
    created_at,
    status,
    attended,
    checkin_time
FROM registrations
WHERE participant_id = ?1 AND event_occurrence_id = ?2
LIMIT 1
"#;

const SQL_LOAD_BY_ID: &str = r#"
SELECT
    registration_id,
    participant_id,
    event_occurrence_id,
    created_at,
    status,
    attended,
    checkin_time
FROM registrations
WHERE registration_id = ?1
LIMIT 1
"#;

const SQL_INSERT: &str = r#"
INSERT INTO registrations (
  registration_id,
  participant_id,
  event_occurrence_id,
  created_at,
  status
) VALUES (?1, ?2, ?3, datetime('now'), 'Registered')
"#;

const SQL_DELETE_OWNED: &str = r#"
DELETE FROM registrations
WHERE registration_id = ?1 AND participant_id = ?2
"#;

const SQL_LIST_UPCOMING: &str = r#"
SELECT
    r.registration_id,
    et.name AS event_name,
    et.event_type,
    eo.starts_at,
    eo.location,
    r.status
FROM registrations r
JOIN event_occurrences eo ON eo.event_occurrence_id = r.event_occurrence_id
JOIN event_templates et ON et.event_template_id = eo.event_template_id
WHERE r.participant_id = ?1
  AND eo.starts_at >= datetime('now')
ORDER BY eo.starts_at ASC
"#;

const SQL_LIST_PAST: &str = r#"
SELECT
    r.registration_id,
    et.name AS event_name,
    et.event_type,
    eo.starts_at,
    eo.location,
    r.status
FROM registrations r
JOIN event_occurrences eo ON eo.event_occurrence_id = r.event_occurrence_id
JOIN event_templates et ON et.event_template_id = eo.event_template_id
WHERE r.participant_id = ?1
  AND eo.starts_at < datetime('now')
ORDER BY eo.starts_at DESC
"#;

/// Highest current identifier + 1; 1 on an empty table. Call inside the
/// inserting transaction.
pub async fn next_registration_id<'e, E>(ex: E) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(SQL_NEXT_REGISTRATION_ID).fetch_one(ex).await
}

pub async fn find_by_pair<'e, E>(
    ex: E,
    participant_id: i64,
    occurrence_id: i64,
) -> sqlx::Result<Option<RegistrationRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, RegistrationRow>(SQL_FIND_BY_PAIR)
        .bind(participant_id)
        .bind(occurrence_id)
        .fetch_optional(ex)
        .await
}

pub async fn load_by_id<'e, E>(
    ex: E,
    registration_id: i64,
) -> sqlx::Result<Option<RegistrationRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, RegistrationRow>(SQL_LOAD_BY_ID)
        .bind(registration_id)
        .fetch_optional(ex)
        .await
}

pub async fn insert<'e, E>(
    ex: E,
    registration_id: i64,
    participant_id: i64,
    occurrence_id: i64,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_INSERT)
        .bind(registration_id)
        .bind(participant_id)
        .bind(occurrence_id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

/// Deletes only when the registration belongs to the given participant.
pub async fn delete_owned<'e, E>(
    ex: E,
    registration_id: i64,
    participant_id: i64,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_DELETE_OWNED)
        .bind(registration_id)
        .bind(participant_id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn list_upcoming<'e, E>(
    ex: E,
    participant_id: i64,
) -> sqlx::Result<Vec<RegistrationWithEventRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, RegistrationWithEventRow>(SQL_LIST_UPCOMING)
        .bind(participant_id)
        .fetch_all(ex)
        .await
}

pub async fn list_past<'e, E>(
    ex: E,
    participant_id: i64,
) -> sqlx::Result<Vec<RegistrationWithEventRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, RegistrationWithEventRow>(SQL_LIST_PAST)
        .bind(participant_id)
        .fetch_all(ex)
        .await
}
