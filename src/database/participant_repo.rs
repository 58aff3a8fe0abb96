use sqlx::{Executor, Sqlite};

use crate::models::ParticipantRow;

const SQL_NEXT_PARTICIPANT_ID: &str = r#"
SELECT COALESCE(MAX(participant_id), 0) + 1 FROM participants
"#;

const SQL_LOAD_BY_EMAIL: &str = r#"
SELECT
    participant_id,
    email,
    password,
    first_name,
    last_name,
    phone,
    city,
    state,
    zip,
    role
FROM participants
WHERE email = ?1
LIMIT 1
"#;

const SQL_LOAD_BY_ID: &str = r#"
SELECT
    participant_id,
    email,
    password,
    first_name,
    last_name,
    phone,
    city,
    state,
    zip,
    role
FROM participants
WHERE participant_id = ?1
LIMIT 1
"#;

const SQL_LIST: &str = r#"
SELECT
    participant_id,
    email,
    password,
    first_name,
    last_name,
    phone,
    city,
    state,
    zip,
    role
FROM participants
WHERE ?1 = ''
   OR first_name LIKE '%' || ?1 || '%'
   OR last_name LIKE '%' || ?1 || '%'
   OR email LIKE '%' || ?1 || '%'
   OR first_name || ' ' || last_name LIKE '%' || ?1 || '%'
ORDER BY participant_id ASC
"#;

const SQL_LIST_BY_FIRST_NAME: &str = r#"
SELECT
    participant_id,
    email,
    password,
    first_name,
    last_name,
    phone,
    city,
    state,
    zip,
    role
FROM participants
ORDER BY first_name
"#;

const SQL_INSERT: &str = r#"
INSERT INTO participants (
  participant_id,
  email,
  password,
  first_name,
  last_name,
  phone,
  city,
  state,
  zip,
  role
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const SQL_UPDATE_PROFILE: &str = r#"
UPDATE participants
SET first_name = ?2,
    last_name = ?3,
    phone = ?4,
    city = ?5,
    state = ?6,
    zip = ?7
WHERE email = ?1
"#;

const SQL_UPDATE_PROFILE_WITH_PASSWORD: &str = r#"
UPDATE participants
SET first_name = ?2,
    last_name = ?3,
    phone = ?4,
    city = ?5,
    state = ?6,
    zip = ?7,
    password = ?8
WHERE email = ?1
"#;

const SQL_DELETE: &str = r#"
DELETE FROM participants WHERE participant_id = ?1
"#;

/// Highest current identifier + 1; 1 on an empty table.
///
/// Only call inside the transaction that performs the matching insert: two
/// allocations outside a shared transaction can hand out the same value.
pub async fn next_participant_id<'e, E>(ex: E) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(SQL_NEXT_PARTICIPANT_ID).fetch_one(ex).await
}

pub async fn load_by_email<'e, E>(ex: E, email: &str) -> sqlx::Result<Option<ParticipantRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, ParticipantRow>(SQL_LOAD_BY_EMAIL)
        .bind(email)
        .fetch_optional(ex)
        .await
}

pub async fn load_by_id<'e, E>(ex: E, participant_id: i64) -> sqlx::Result<Option<ParticipantRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, ParticipantRow>(SQL_LOAD_BY_ID)
        .bind(participant_id)
        .fetch_optional(ex)
        .await
}

pub async fn list<'e, E>(ex: E, search: &str) -> sqlx::Result<Vec<ParticipantRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, ParticipantRow>(SQL_LIST)
        .bind(search)
        .fetch_all(ex)
        .await
}

pub async fn list_by_first_name<'e, E>(ex: E) -> sqlx::Result<Vec<ParticipantRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, ParticipantRow>(SQL_LIST_BY_FIRST_NAME)
        .fetch_all(ex)
        .await
}

pub struct NewParticipant<'a> {
    pub participant_id: i64,
    pub email: &'a str,
    pub password: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip: Option<&'a str>,
    pub role: &'a str,
}

pub async fn insert<'e, E>(ex: E, row: NewParticipant<'_>) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_INSERT)
        .bind(row.participant_id)
        .bind(row.email)
        .bind(row.password)
        .bind(row.first_name)
        .bind(row.last_name)
        .bind(row.phone)
        .bind(row.city)
        .bind(row.state)
        .bind(row.zip)
        .bind(row.role)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub struct ProfileUpdate<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip: Option<&'a str>,
    /// `Some` replaces the credential, `None` leaves it untouched.
    pub password: Option<&'a str>,
}

pub async fn update_profile<'e, E>(ex: E, email: &str, upd: ProfileUpdate<'_>) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = match upd.password {
        Some(password) => {
            sqlx::query(SQL_UPDATE_PROFILE_WITH_PASSWORD)
                .bind(email)
                .bind(upd.first_name)
                .bind(upd.last_name)
                .bind(upd.phone)
                .bind(upd.city)
                .bind(upd.state)
                .bind(upd.zip)
                .bind(password)
                .execute(ex)
                .await?
        }
        None => {
            sqlx::query(SQL_UPDATE_PROFILE)
                .bind(email)
                .bind(upd.first_name)
                .bind(upd.last_name)
                .bind(upd.phone)
                .bind(upd.city)
                .bind(upd.state)
                .bind(upd.zip)
                .execute(ex)
                .await?
        }
    };
    Ok(res.rows_affected())
}

pub async fn delete<'e, E>(ex: E, participant_id: i64) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_DELETE).bind(participant_id).execute(ex).await?;
    Ok(res.rows_affected())
}
