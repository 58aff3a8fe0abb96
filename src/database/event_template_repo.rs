use sqlx::{Executor, Sqlite};

use crate::models::EventTemplateRow;

const SQL_NEXT_EVENT_TEMPLATE_ID: &str = r#"
SELECT COALESCE(MAX(event_template_id), 0) + 1 FROM event_templates
"#;

const SQL_LIST: &str = r#"
SELECT
    event_template_id,
    name,
    event_type,
    recurrence_pattern,
    description,
    default_capacity
FROM event_templates
WHERE ?1 = '' OR name LIKE '%' || ?1 || '%'
ORDER BY event_template_id
"#;

const SQL_LOAD_BY_ID: &str = r#"
SELECT
    event_template_id,
    name,
    event_type,
    recurrence_pattern,
    description,
    default_capacity
FROM event_templates
WHERE event_template_id = ?1
LIMIT 1
"#;

const SQL_INSERT: &str = r#"
INSERT INTO event_templates (
  event_template_id,
  name,
  event_type,
  recurrence_pattern,
  description,
  default_capacity
) VALUES (?, ?, ?, ?, ?, ?)
"#;

const SQL_UPDATE: &str = r#"
UPDATE event_templates
SET name = ?2,
    event_type = ?3,
    recurrence_pattern = ?4,
    description = ?5,
    default_capacity = ?6
WHERE event_template_id = ?1
"#;

const SQL_DELETE: &str = r#"
DELETE FROM event_templates WHERE event_template_id = ?1
"#;

/// Highest current identifier + 1; 1 on an empty table. Call inside the
/// inserting transaction.
pub async fn next_event_template_id<'e, E>(ex: E) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(SQL_NEXT_EVENT_TEMPLATE_ID).fetch_one(ex).await
}

pub async fn list<'e, E>(ex: E, search: &str) -> sqlx::Result<Vec<EventTemplateRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, EventTemplateRow>(SQL_LIST)
        .bind(search)
        .fetch_all(ex)
        .await
}

pub async fn load_by_id<'e, E>(ex: E, template_id: i64) -> sqlx::Result<Option<EventTemplateRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, EventTemplateRow>(SQL_LOAD_BY_ID)
        .bind(template_id)
        .fetch_optional(ex)
        .await
}

pub struct NewEventTemplate<'a> {
    pub event_template_id: i64,
    pub name: &'a str,
    pub event_type: Option<&'a str>,
    pub recurrence_pattern: Option<&'a str>,
    pub description: Option<&'a str>,
    pub default_capacity: Option<i64>,
}

pub async fn insert<'e, E>(ex: E, row: NewEventTemplate<'_>) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_INSERT)
        .bind(row.event_template_id)
        .bind(row.name)
        .bind(row.event_type)
        .bind(row.recurrence_pattern)
        .bind(row.description)
        .bind(row.default_capacity)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub struct EventTemplateUpdate<'a> {
    pub name: &'a str,
    pub event_type: Option<&'a str>,
    pub recurrence_pattern: Option<&'a str>,
    pub description: Option<&'a str>,
    pub default_capacity: Option<i64>,
}

pub async fn update<'e, E>(
    ex: E,
    template_id: i64,
    upd: EventTemplateUpdate<'_>,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_UPDATE)
        .bind(template_id)
        .bind(upd.name)
        .bind(upd.event_type)
        .bind(upd.recurrence_pattern)
        .bind(upd.description)
        .bind(upd.default_capacity)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete<'e, E>(ex: E, template_id: i64) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_DELETE).bind(template_id).execute(ex).await?;
    Ok(res.rows_affected())
}
