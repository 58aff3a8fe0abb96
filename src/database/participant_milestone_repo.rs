use sqlx::{Executor, Sqlite};

use crate::models::{AchievementWithTitleRow, ParticipantMilestoneRow};

const SQL_NEXT_PARTICIPANT_MILESTONE_ID: &str = r#"
SELECT COALESCE(MAX(participant_milestone_id), 0) + 1 FROM participant_milestones
"#;

const SQL_NEXT_MILESTONE_NO: &str = r#"
SELECT COALESCE(MAX(milestone_no), 0) + 1
FROM participant_milestones
WHERE participant_id = ?1
"#;

const SQL_COUNT_ALL: &str = r#"
SELECT COUNT(*) FROM participant_milestones
"#;

const SQL_LOAD_BY_ID: &str = r#"
SELECT
    participant_milestone_id,
    participant_id,
    milestone_id,
    achieved_on,
    milestone_no
FROM participant_milestones
WHERE participant_milestone_id = ?1
LIMIT 1
"#;

const SQL_INSERT: &str = r#"
INSERT INTO participant_milestones (
  participant_milestone_id,
  participant_id,
  milestone_id,
  achieved_on,
  milestone_no
) VALUES (?, ?, ?, ?, ?)
"#;

const SQL_UPDATE: &str = r#"
UPDATE participant_milestones
SET milestone_id = ?2,
    achieved_on = ?3
WHERE participant_milestone_id = ?1
"#;

const SQL_DELETE: &str = r#"
DELETE FROM participant_milestones WHERE participant_milestone_id = ?1
"#;

const SQL_LIST_FOR_PARTICIPANT: &str = r#"
SELECT
    pm.participant_milestone_id,
    pm.milestone_id,
    m.title,
    pm.achieved_on,
    pm.milestone_no
FROM participant_milestones pm
JOIN milestones m ON m.milestone_id = pm.milestone_id
WHERE pm.participant_id = ?1
ORDER BY pm.achieved_on DESC
"#;

/// Highest current identifier + 1; 1 on an empty table. Call inside the
/// inserting transaction.
pub async fn next_participant_milestone_id<'e, E>(ex: E) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(SQL_NEXT_PARTICIPANT_MILESTONE_ID)
        .fetch_one(ex)
        .await
}

/// Next per-participant sequence number: highest assigned + 1, so numbers
/// stay strictly increasing even after earlier records are deleted. Call
/// inside the inserting transaction.
pub async fn next_milestone_no<'e, E>(ex: E, participant_id: i64) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(SQL_NEXT_MILESTONE_NO)
        .bind(participant_id)
        .fetch_one(ex)
        .await
}

pub async fn count_all<'e, E>(ex: E) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(SQL_COUNT_ALL).fetch_one(ex).await
}

pub async fn load_by_id<'e, E>(
    ex: E,
    participant_milestone_id: i64,
) -> sqlx::Result<Option<ParticipantMilestoneRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, ParticipantMilestoneRow>(SQL_LOAD_BY_ID)
        .bind(participant_milestone_id)
        .fetch_optional(ex)
        .await
}

pub struct NewAchievement<'a> {
    pub participant_milestone_id: i64,
    pub participant_id: i64,
    pub milestone_id: i64,
    pub achieved_on: Option<&'a str>,
    pub milestone_no: i64,
}

pub async fn insert<'e, E>(ex: E, row: NewAchievement<'_>) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_INSERT)
        .bind(row.participant_milestone_id)
        .bind(row.participant_id)
        .bind(row.milestone_id)
        .bind(row.achieved_on)
        .bind(row.milestone_no)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn update<'e, E>(
    ex: E,
    participant_milestone_id: i64,
    milestone_id: i64,
    achieved_on: Option<&str>,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_UPDATE)
        .bind(participant_milestone_id)
        .bind(milestone_id)
        .bind(achieved_on)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete<'e, E>(ex: E, participant_milestone_id: i64) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_DELETE)
        .bind(participant_milestone_id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn list_for_participant<'e, E>(
    ex: E,
    participant_id: i64,
) -> sqlx::Result<Vec<AchievementWithTitleRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, AchievementWithTitleRow>(SQL_LIST_FOR_PARTICIPANT)
        .bind(participant_id)
        .fetch_all(ex)
        .await
}
