use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{error, warn};

use crate::models::EventTemplateRow;
use crate::services::event_service::{self, EventOccurrenceInput, EventTemplateInput};
use crate::services::registration_service::{self, RegistrationError};
use crate::web::access::SessionUser;
use crate::web::routes::ErrorTemplate;

#[derive(Template)]
#[template(path = "events.html")]
pub struct EventsTemplate {
    pub events: Vec<EventTemplateRow>,
    pub search: String,
    pub alert_message: Option<&'static str>,
    pub alert_type: &'static str,
    pub can_manage: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct EventsQuery {
    pub search: Option<String>,
    pub msg: Option<String>,
}

fn alert_for(msg: Option<&str>) -> (Option<&'static str>, &'static str) {
    match msg {
        Some("registered") => (
            Some("You have successfully registered for the event!"),
            "success",
        ),
        Some("already") => (Some("You are already registered for this event."), "warning"),
        Some("nodate") => (Some("No upcoming event dates are available."), "secondary"),
        Some("notfound") => (Some("Participant record not found."), "danger"),
        Some("added") => (Some("Event date added."), "success"),
        Some("error") => (
            Some("An error occurred while processing your registration."),
            "danger",
        ),
        _ => (None, "info"),
    }
}

pub async fn events_handler(
    Extension(user): Extension<SessionUser>,
    Query(query): Query<EventsQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    let search = query.search.unwrap_or_default();
    let (alert_message, alert_type) = alert_for(query.msg.as_deref());

    let events = match event_service::list_templates(&pool, &search).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Event list failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = EventsTemplate {
        events,
        search,
        alert_message,
        alert_type,
        can_manage: user.is_elevated(),
    };
    Html(template.render().unwrap()).into_response()
}

#[derive(Template)]
#[template(path = "add_event.html")]
pub struct AddEventTemplate;

pub async fn add_event_page() -> Html<String> {
    Html(AddEventTemplate.render().unwrap())
}

#[derive(Debug, Deserialize)]
pub struct EventTemplateForm {
    pub name: String,
    pub event_type: Option<String>,
    pub recurrence_pattern: Option<String>,
    pub description: Option<String>,
    pub default_capacity: Option<i64>,
}

pub async fn add_event_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<EventTemplateForm>,
) -> Response {
    let created = event_service::create_template(
        &pool,
        EventTemplateInput {
            name: &form.name,
            event_type: form.event_type.as_deref(),
            recurrence_pattern: form.recurrence_pattern.as_deref(),
            description: form.description.as_deref(),
            default_capacity: form.default_capacity,
        },
    )
    .await;

    match created {
        Ok(_) => Redirect::to("/events").into_response(),
        Err(e) => {
            error!("Event creation failed: {}", e);
            let template = ErrorTemplate {
                message: "Error adding event.".to_string(),
            };
            Html(template.render().unwrap()).into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "edit_event.html")]
pub struct EditEventTemplate {
    pub event: EventTemplateRow,
}

pub async fn edit_event_page(
    Path(template_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match event_service::load_template(&pool, template_id).await {
        Ok(Some(event)) => {
            let template = EditEventTemplate { event };
            Html(template.render().unwrap()).into_response()
        }
        Ok(None) => Redirect::to("/events").into_response(),
        Err(e) => {
            error!("Event load failed for {}: {}", template_id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn edit_event_handler(
    Path(template_id): Path<i64>,
    State(pool): State<SqlitePool>,
    Form(form): Form<EventTemplateForm>,
) -> Response {
    let updated = event_service::update_template(
        &pool,
        template_id,
        EventTemplateInput {
            name: &form.name,
            event_type: form.event_type.as_deref(),
            recurrence_pattern: form.recurrence_pattern.as_deref(),
            description: form.description.as_deref(),
            default_capacity: form.default_capacity,
        },
    )
    .await;

    match updated {
        Ok(_) => Redirect::to("/events").into_response(),
        Err(e) => {
            error!("Event update failed for {}: {}", template_id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn delete_event_handler(
    Path(template_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match event_service::delete_template(&pool, template_id).await {
        Ok(()) => Redirect::to("/events").into_response(),
        Err(e) => {
            warn!("Event delete failed for {}: {}", template_id, e);
            let template = ErrorTemplate {
                message: "Error deleting event. This event may be linked to existing schedules or surveys.".to_string(),
            };
            Html(template.render().unwrap()).into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "add_event_date.html")]
pub struct AddEventDateTemplate {
    pub events: Vec<EventTemplateRow>,
}

pub async fn add_date_page(State(pool): State<SqlitePool>) -> Response {
    match event_service::list_templates(&pool, "").await {
        Ok(events) => {
            let template = AddEventDateTemplate { events };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => {
            error!("Event list failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EventDateForm {
    pub event_template_id: i64,
    pub starts_at: String,
    pub ends_at: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i64>,
    pub registration_deadline: Option<String>,
}

pub async fn add_date_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<EventDateForm>,
) -> Response {
    let created = event_service::add_occurrence(
        &pool,
        EventOccurrenceInput {
            event_template_id: form.event_template_id,
            starts_at: &form.starts_at,
            ends_at: form.ends_at.as_deref(),
            location: form.location.as_deref(),
            capacity: form.capacity,
            registration_deadline: form.registration_deadline.as_deref(),
        },
    )
    .await;

    match created {
        Ok(_) => Redirect::to("/events?msg=added").into_response(),
        Err(e) => {
            warn!("Occurrence creation failed: {}", e);
            Redirect::to("/events?msg=error").into_response()
        }
    }
}

/// Registration by template: the participant lands on the most recently
/// starting occurrence. Outcomes travel back as `?msg=` codes on the event
/// list.
pub async fn register_template_handler(
    Extension(user): Extension<SessionUser>,
    Path(template_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    let msg = match registration_service::register_by_template(&pool, &user.email, template_id)
        .await
    {
        Ok(_) => "registered",
        Err(RegistrationError::ParticipantNotFound) => "notfound",
        Err(RegistrationError::NoOccurrenceAvailable) => "nodate",
        Err(RegistrationError::AlreadyRegistered) => "already",
        Err(e) => {
            warn!("Registration failed for {}: {}", user.email, e);
            "error"
        }
    };
    Redirect::to(&format!("/events?msg={}", msg)).into_response()
}

pub async fn register_occurrence_handler(
    Extension(user): Extension<SessionUser>,
    Path(occurrence_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match registration_service::register_by_occurrence(&pool, user.participant_id, occurrence_id)
        .await
    {
        Ok(_) => "Successfully registered!".into_response(),
        Err(RegistrationError::OccurrenceNotFound) => {
            (StatusCode::BAD_REQUEST, "Event occurrence not found.").into_response()
        }
        Err(RegistrationError::AlreadyRegistered) => {
            (StatusCode::BAD_REQUEST, "You are already registered.").into_response()
        }
        Err(e) => {
            warn!("Registration failed for {}: {}", user.email, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error registering for event.",
            )
                .into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "event_calendar.html")]
pub struct EventCalendarTemplate {
    pub title: String,
    pub template_id: i64,
}

pub async fn calendar_page(
    Path(template_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    let title = match event_service::load_template(&pool, template_id).await {
        Ok(Some(event)) => event.name,
        Ok(None) => "Event Calendar".to_string(),
        Err(e) => {
            warn!("Calendar page load failed for {}: {}", template_id, e);
            return Redirect::to("/events?msg=error").into_response();
        }
    };

    let template = EventCalendarTemplate { title, template_id };
    Html(template.render().unwrap()).into_response()
}

pub async fn calendar_data(
    Path(template_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match event_service::calendar_feed(&pool, template_id).await {
        Ok(events) => Json(events).into_response(),
        Err(e) => {
            error!("Calendar feed failed for {}: {}", template_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Error loading events" })),
            )
                .into_response()
        }
    }
}
