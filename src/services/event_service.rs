use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::{event_occurrence_repo, event_template_repo};
use crate::models::{EventTemplateRow, OccurrenceWithTemplateRow};
use crate::services::error::{ServiceError, ServiceResult};

pub async fn list_templates(
    pool: &SqlitePool,
    search: &str,
) -> ServiceResult<Vec<EventTemplateRow>> {
    Ok(event_template_repo::list(pool, search).await?)
}

pub async fn load_template(
    pool: &SqlitePool,
    template_id: i64,
) -> ServiceResult<Option<EventTemplateRow>> {
    Ok(event_template_repo::load_by_id(pool, template_id).await?)
}

pub struct EventTemplateInput<'a> {
    pub name: &'a str,
    pub event_type: Option<&'a str>,
    pub recurrence_pattern: Option<&'a str>,
    pub description: Option<&'a str>,
    pub default_capacity: Option<i64>,
}

pub async fn create_template(
    pool: &SqlitePool,
    input: EventTemplateInput<'_>,
) -> ServiceResult<i64> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::Validation("event name is required"));
    }

    let mut tx = pool.begin().await?;
    let template_id = event_template_repo::next_event_template_id(&mut *tx).await?;
    event_template_repo::insert(
        &mut *tx,
        event_template_repo::NewEventTemplate {
            event_template_id: template_id,
            name: input.name,
            event_type: input.event_type,
            recurrence_pattern: input.recurrence_pattern,
            description: input.description,
            default_capacity: input.default_capacity,
        },
    )
    .await?;
    tx.commit().await?;
    Ok(template_id)
}

pub async fn update_template(
    pool: &SqlitePool,
    template_id: i64,
    input: EventTemplateInput<'_>,
) -> ServiceResult<()> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::Validation("event name is required"));
    }
    let updated = event_template_repo::update(
        pool,
        template_id,
        event_template_repo::EventTemplateUpdate {
            name: input.name,
            event_type: input.event_type,
            recurrence_pattern: input.recurrence_pattern,
            description: input.description,
            default_capacity: input.default_capacity,
        },
    )
    .await?;
    if updated == 0 {
        return Err(ServiceError::NotFound("event not found"));
    }
    Ok(())
}

/// Fails with a storage error when occurrences or surveys still reference
/// the template; the route renders that as the "may be linked" message.
pub async fn delete_template(pool: &SqlitePool, template_id: i64) -> ServiceResult<()> {
    let deleted = event_template_repo::delete(pool, template_id).await?;
    if deleted == 0 {
        return Err(ServiceError::NotFound("event not found"));
    }
    Ok(())
}

pub struct EventOccurrenceInput<'a> {
    pub event_template_id: i64,
    pub starts_at: &'a str,
    pub ends_at: Option<&'a str>,
    pub location: Option<&'a str>,
    pub capacity: Option<i64>,
    pub registration_deadline: Option<&'a str>,
}

pub async fn add_occurrence(
    pool: &SqlitePool,
    input: EventOccurrenceInput<'_>,
) -> ServiceResult<i64> {
    if input.starts_at.trim().is_empty() {
        return Err(ServiceError::Validation("start date is required"));
    }

    let mut tx = pool.begin().await?;

    if event_template_repo::load_by_id(&mut *tx, input.event_template_id)
        .await?
        .is_none()
    {
        return Err(ServiceError::NotFound("event not found"));
    }

    let occurrence_id = event_occurrence_repo::next_event_occurrence_id(&mut *tx).await?;
    event_occurrence_repo::insert(
        &mut *tx,
        event_occurrence_repo::NewEventOccurrence {
            event_occurrence_id: occurrence_id,
            event_template_id: input.event_template_id,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            location: input.location,
            capacity: input.capacity,
            registration_deadline: input.registration_deadline,
        },
    )
    .await?;
    tx.commit().await?;
    Ok(occurrence_id)
}

pub async fn list_occurrences(
    pool: &SqlitePool,
) -> ServiceResult<Vec<OccurrenceWithTemplateRow>> {
    Ok(event_occurrence_repo::list_with_template(pool).await?)
}

/// Entry in the calendar feed, the only JSON surface of the site.
#[derive(Debug, Serialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub location: Option<String>,
}

pub async fn calendar_feed(
    pool: &SqlitePool,
    template_id: i64,
) -> ServiceResult<Vec<CalendarEvent>> {
    let rows = event_occurrence_repo::calendar_for_template(pool, template_id).await?;
    Ok(rows
        .into_iter()
        .map(|row| CalendarEvent {
            id: row.event_occurrence_id,
            title: row.event_name,
            start: row.starts_at,
            end: row.ends_at,
            location: row.location,
        })
        .collect())
}
