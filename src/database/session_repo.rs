use sqlx::{Executor, Sqlite};

use crate::models::ParticipantRow;

const SQL_INSERT_SESSION: &str = r#"
INSERT INTO sessions (session_id, participant_id) VALUES (?1, ?2)
"#;

const SQL_LOAD_SESSION_PARTICIPANT: &str = r#"
SELECT
    p.participant_id,
    p.email,
    p.password,
    p.first_name,
    p.last_name,
    p.phone,
    p.city,
    p.state,
    p.zip,
    p.role
FROM sessions s
JOIN participants p ON p.participant_id = s.participant_id
WHERE s.session_id = ?1
LIMIT 1
"#;

const SQL_DELETE_SESSION: &str = r#"
DELETE FROM sessions WHERE session_id = ?1
"#;

pub async fn insert_session<'e, E>(ex: E, session_id: &str, participant_id: i64) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(SQL_INSERT_SESSION)
        .bind(session_id)
        .bind(participant_id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn load_session_participant<'e, E>(
    ex: E,
    session_id: &str,
) -> sqlx::Result<Option<ParticipantRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, ParticipantRow>(SQL_LOAD_SESSION_PARTICIPANT)
        .bind(session_id)
        .fetch_optional(ex)
        .await
}

pub async fn delete_session<'e, E>(ex: E, session_id: &str) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_DELETE_SESSION).bind(session_id).execute(ex).await?;
    Ok(res.rows_affected())
}
