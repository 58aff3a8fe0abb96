use sqlx::{Executor, Sqlite};

use crate::models::{MilestoneAchieverRow, MilestoneRow};

const SQL_NEXT_MILESTONE_ID: &str = r#"
SELECT COALESCE(MAX(milestone_id), 0) + 1 FROM milestones
"#;

const SQL_LIST: &str = r#"
SELECT milestone_id, title
FROM milestones
WHERE ?1 = '' OR title LIKE '%' || ?1 || '%'
ORDER BY milestone_id
"#;

const SQL_LOAD_BY_ID: &str = r#"
SELECT milestone_id, title
FROM milestones
WHERE milestone_id = ?1
LIMIT 1
"#;

const SQL_INSERT: &str = r#"
INSERT INTO milestones (milestone_id, title) VALUES (?1, ?2)
"#;

const SQL_UPDATE: &str = r#"
UPDATE milestones SET title = ?2 WHERE milestone_id = ?1
"#;

const SQL_DELETE: &str = r#"
DELETE FROM milestones WHERE milestone_id = ?1
"#;

const SQL_LIST_ACHIEVERS: &str = r#"
SELECT
    p.first_name,
    p.last_name,
    p.email,
    pm.achieved_on
FROM participant_milestones pm
JOIN participants p ON p.participant_id = pm.participant_id
WHERE pm.milestone_id = ?1
ORDER BY pm.achieved_on DESC
"#;

/// Highest current identifier + 1; 1 on an empty table. Call inside the
/// inserting transaction.
pub async fn next_milestone_id<'e, E>(ex: E) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(SQL_NEXT_MILESTONE_ID).fetch_one(ex).await
}

pub async fn list<'e, E>(ex: E, search: &str) -> sqlx::Result<Vec<MilestoneRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, MilestoneRow>(SQL_LIST)
        .bind(search)
        .fetch_all(ex)
        .await
}

pub async fn load_by_id<'e, E>(ex: E, milestone_id: i64) -> sqlx::Result<Option<MilestoneRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, MilestoneRow>(SQL_LOAD_BY_ID)
        .bind(milestone_id)
        .fetch_optional(ex)
        .await
}

pub async fn insert<'e, E>(ex: E, milestone_id: i64, title: &str) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_INSERT)
        .bind(milestone_id)
        .bind(title)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn update<'e, E>(ex: E, milestone_id: i64, title: &str) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_UPDATE)
        .bind(milestone_id)
        .bind(title)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete<'e, E>(ex: E, milestone_id: i64) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_DELETE).bind(milestone_id).execute(ex).await?;
    Ok(res.rows_affected())
}

pub async fn list_achievers<'e, E>(
    ex: E,
    milestone_id: i64,
) -> sqlx::Result<Vec<MilestoneAchieverRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, MilestoneAchieverRow>(SQL_LIST_ACHIEVERS)
        .bind(milestone_id)
        .fetch_all(ex)
        .await
}
