use sqlx::{Executor, Sqlite};

use crate::models::{EventOccurrenceRow, OccurrenceWithTemplateRow};

const SQL_NEXT_EVENT_OCCURRENCE_ID: &str = r#"
SELECT COALESCE(MAX(event_occurrence_id), 0) + 1 FROM event_occurrences
"#;

const SQL_LOAD_BY_ID: &str = r#"
SELECT
    event_occurrence_id,
    event_template_id,
    starts_at,
    ends_at,
    location,
    capacity,
    registration_deadline
FROM event_occurrences
WHERE event_occurrence_id = ?1
LIMIT 1
"#;

// Tie-break on equal starts: lowest identifier wins.
const SQL_LATEST_FOR_TEMPLATE: &str = r#"
SELECT
    event_occurrence_id,
    event_template_id,
    starts_at,
    ends_at,
    location,
    capacity,
    registration_deadline
FROM event_occurrences
WHERE event_template_id = ?1
ORDER BY starts_at DESC, event_occurrence_id ASC
LIMIT 1
"#;

const SQL_LIST_WITH_TEMPLATE: &str = r#"
SELECT
    eo.event_occurrence_id,
    et.name AS event_name,
    eo.starts_at,
    eo.ends_at,
    eo.location
FROM event_occurrences eo
JOIN event_templates et ON et.event_template_id = eo.event_template_id
ORDER BY eo.starts_at DESC
"#;

const SQL_CALENDAR_FOR_TEMPLATE: &str = r#"
SELECT
    eo.event_occurrence_id,
    et.name AS event_name,
    eo.starts_at,
    eo.ends_at,
    eo.location
FROM event_occurrences eo
JOIN event_templates et ON et.event_template_id = eo.event_template_id
WHERE eo.event_template_id = ?1
"#;

const SQL_INSERT: &str = r#"
INSERT INTO event_occurrences (
  event_occurrence_id,
  event_template_id,
  starts_at,
  ends_at,
  location,
  capacity,
  registration_deadline
) VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

/// Highest current identifier + 1; 1 on an empty table. Call inside the
/// inserting transaction.
pub async fn next_event_occurrence_id<'e, E>(ex: E) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(SQL_NEXT_EVENT_OCCURRENCE_ID).fetch_one(ex).await
}

pub async fn load_by_id<'e, E>(
    ex: E,
    occurrence_id: i64,
) -> sqlx::Result<Option<EventOccurrenceRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, EventOccurrenceRow>(SQL_LOAD_BY_ID)
        .bind(occurrence_id)
        .fetch_optional(ex)
        .await
}

/// Most recently starting occurrence of a template.
pub async fn latest_for_template<'e, E>(
    ex: E,
    template_id: i64,
) -> sqlx::Result<Option<EventOccurrenceRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, EventOccurrenceRow>(SQL_LATEST_FOR_TEMPLATE)
        .bind(template_id)
        .fetch_optional(ex)
        .await
}

pub async fn list_with_template<'e, E>(ex: E) -> sqlx::Result<Vec<OccurrenceWithTemplateRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, OccurrenceWithTemplateRow>(SQL_LIST_WITH_TEMPLATE)
        .fetch_all(ex)
        .await
}

pub async fn calendar_for_template<'e, E>(
    ex: E,
    template_id: i64,
) -> sqlx::Result<Vec<OccurrenceWithTemplateRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, OccurrenceWithTemplateRow>(SQL_CALENDAR_FOR_TEMPLATE)
        .bind(template_id)
        .fetch_all(ex)
        .await
}

pub struct NewEventOccurrence<'a> {
    pub event_occurrence_id: i64,
    pub event_template_id: i64,
    pub starts_at: &'a str,
    pub ends_at: Option<&'a str>,
    pub location: Option<&'a str>,
    pub capacity: Option<i64>,
    pub registration_deadline: Option<&'a str>,
}

pub async fn insert<'e, E>(ex: E, row: NewEventOccurrence<'_>) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_INSERT)
        .bind(row.event_occurrence_id)
        .bind(row.event_template_id)
        .bind(row.starts_at)
        .bind(row.ends_at)
        .bind(row.location)
        .bind(row.capacity)
        .bind(row.registration_deadline)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}
