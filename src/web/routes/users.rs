use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{error, warn};

use crate::models::{OccurrenceWithTemplateRow, ParticipantRow, Role};
use crate::services::event_service;
use crate::services::identity_service::{self, NewParticipantInput};
use crate::services::profile_service::{self, ParticipantDetailView};
use crate::services::registration_service::{self, RegistrationError};
use crate::web::routes::ErrorTemplate;

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub users: Vec<ParticipantRow>,
    pub search: String,
}

pub async fn users_handler(
    Query(query): Query<SearchQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    let search = query.search.unwrap_or_default();
    match identity_service::list_participants(&pool, &search).await {
        Ok(users) => {
            let template = UsersTemplate { users, search };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => {
            error!("User list failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "participants.html")]
pub struct ParticipantsTemplate {
    pub participants: Vec<ParticipantRow>,
    pub search: String,
}

pub async fn participants_handler(
    Query(query): Query<SearchQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    let search = query.search.unwrap_or_default();
    match identity_service::list_participants(&pool, &search).await {
        Ok(participants) => {
            let template = ParticipantsTemplate {
                participants,
                search,
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => {
            error!("Participant list failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "participant_detail.html")]
pub struct ParticipantDetailTemplate {
    pub detail: ParticipantDetailView,
}

pub async fn user_detail_handler(
    Path(participant_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match profile_service::load_participant_detail(&pool, participant_id).await {
        Ok(Some(detail)) => {
            let template = ParticipantDetailTemplate { detail };
            Html(template.render().unwrap()).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "User not found").into_response(),
        Err(e) => {
            error!("User detail load failed for {}: {}", participant_id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "add_user.html")]
pub struct AddUserTemplate;

pub async fn add_user_page() -> Html<String> {
    Html(AddUserTemplate.render().unwrap())
}

#[derive(Debug, Deserialize)]
pub struct AddUserForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

pub async fn add_user_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<AddUserForm>,
) -> Response {
    let role = Role::parse(&form.role).unwrap_or(Role::Participant);
    let created = identity_service::create_participant(
        &pool,
        NewParticipantInput {
            email: &form.email,
            password: Some(&form.password),
            first_name: Some(&form.first_name),
            last_name: Some(&form.last_name),
            phone: None,
            city: None,
            state: None,
            zip: None,
            role,
        },
    )
    .await;

    match created {
        Ok(_) => Redirect::to("/users").into_response(),
        Err(e) => {
            error!("User creation failed: {}", e);
            let template = ErrorTemplate {
                message: "Error adding user.".to_string(),
            };
            Html(template.render().unwrap()).into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "add_participant.html")]
pub struct AddParticipantTemplate;

pub async fn add_participant_page() -> Html<String> {
    Html(AddParticipantTemplate.render().unwrap())
}

#[derive(Debug, Deserialize)]
pub struct AddParticipantForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

pub async fn add_participant_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<AddParticipantForm>,
) -> Response {
    let role = Role::parse(&form.role).unwrap_or(Role::Participant);
    let created = identity_service::create_participant(
        &pool,
        NewParticipantInput {
            email: &form.email,
            password: Some(&form.password),
            first_name: Some(&form.first_name),
            last_name: Some(&form.last_name),
            phone: form.phone.as_deref(),
            city: form.city.as_deref(),
            state: form.state.as_deref(),
            zip: form.zip.as_deref(),
            role,
        },
    )
    .await;

    match created {
        Ok(_) => Redirect::to("/participants").into_response(),
        Err(e) => {
            error!("Participant creation failed: {}", e);
            let template = ErrorTemplate {
                message: "Error adding participant.".to_string(),
            };
            Html(template.render().unwrap()).into_response()
        }
    }
}

pub async fn delete_user_handler(
    Path(participant_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match identity_service::delete_participant(&pool, participant_id).await {
        Ok(()) => Redirect::to("/users").into_response(),
        Err(e) => {
            warn!("User delete failed for {}: {}", participant_id, e);
            let template = ErrorTemplate {
                message: "Error deleting user. Check for related records.".to_string(),
            };
            Html(template.render().unwrap()).into_response()
        }
    }
}

pub async fn delete_participant_handler(
    Path(participant_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match identity_service::delete_participant(&pool, participant_id).await {
        Ok(()) => Redirect::to("/participants").into_response(),
        Err(e) => {
            warn!("Participant delete failed for {}: {}", participant_id, e);
            let template = ErrorTemplate {
                message: "Error deleting participant. Check for related records.".to_string(),
            };
            Html(template.render().unwrap()).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminDeregisterForm {
    pub participant_id: i64,
}

pub async fn admin_deregister_handler(
    Path(registration_id): Path<i64>,
    State(pool): State<SqlitePool>,
    Form(form): Form<AdminDeregisterForm>,
) -> Response {
    let back = format!("/users/view/{}", form.participant_id);
    match registration_service::deregister_admin(&pool, registration_id, form.participant_id).await
    {
        Ok(()) => Redirect::to(&back).into_response(),
        Err(e) => {
            warn!("Admin deregistration of {} failed: {}", registration_id, e);
            Redirect::to(&back).into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "register_user_event.html")]
pub struct RegisterUserEventTemplate {
    pub participants: Vec<ParticipantRow>,
    pub events: Vec<OccurrenceWithTemplateRow>,
    pub alert_message: Option<&'static str>,
    pub alert_type: &'static str,
}

#[derive(Debug, Deserialize, Default)]
pub struct AdminRegisterQuery {
    pub msg: Option<String>,
}

pub async fn admin_register_page(
    Query(query): Query<AdminRegisterQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    let participants = match identity_service::list_participants_by_first_name(&pool).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Load register page failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error loading registration page.")
                .into_response();
        }
    };
    let events = match event_service::list_occurrences(&pool).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Load register page failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error loading registration page.")
                .into_response();
        }
    };

    let (alert_message, alert_type) = match query.msg.as_deref() {
        Some("registered") => (Some("Registration successful!"), "success"),
        Some("already") => (
            Some("This user is already registered for this event."),
            "warning",
        ),
        Some("missing") => (
            Some("Please select both a participant and an event."),
            "warning",
        ),
        Some("error") => (Some("Error registering user."), "danger"),
        _ => (None, "info"),
    };

    let template = RegisterUserEventTemplate {
        participants,
        events,
        alert_message,
        alert_type,
    };
    Html(template.render().unwrap()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct AdminRegisterForm {
    pub participant_id: Option<i64>,
    pub event_occurrence_id: Option<i64>,
}

pub async fn admin_register_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<AdminRegisterForm>,
) -> Response {
    let (Some(participant_id), Some(occurrence_id)) = (form.participant_id, form.event_occurrence_id)
    else {
        return Redirect::to("/admin/register-event?msg=missing").into_response();
    };

    let msg = match registration_service::register_by_occurrence(&pool, participant_id, occurrence_id)
        .await
    {
        Ok(_) => "registered",
        Err(RegistrationError::AlreadyRegistered) => "already",
        Err(e) => {
            warn!(
                "Admin registration of {} for {} failed: {}",
                participant_id, occurrence_id, e
            );
            "error"
        }
    };
    Redirect::to(&format!("/admin/register-event?msg={}", msg)).into_response()
}
