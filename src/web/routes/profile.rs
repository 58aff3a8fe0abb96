use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{error, warn};

use crate::models::MilestoneRow;
use crate::services::identity_service::{self, ProfileUpdateInput};
use crate::services::milestone_service;
use crate::services::profile_service::{self, ProfileView};
use crate::services::registration_service;
use crate::web::access::SessionUser;

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub profile: ProfileView,
    pub alert_message: Option<&'static str>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ProfileQuery {
    pub msg: Option<String>,
}

pub async fn profile_handler(
    Extension(user): Extension<SessionUser>,
    Query(query): Query<ProfileQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    let profile = match profile_service::load_profile_view(&pool, &user.email).await {
        Ok(Some(view)) => view,
        // Session outlived the participant row; drop the session.
        Ok(None) => return Redirect::to("/logout").into_response(),
        Err(e) => {
            error!("Profile load failed for {}: {}", user.email, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let alert_message = match query.msg.as_deref() {
        Some("deregistered") => Some("You have been deregistered from the event."),
        Some("milestone") => Some("Milestone added!"),
        Some("error") => Some("Something went wrong. Please try again."),
        _ => None,
    };

    let template = ProfileTemplate {
        profile,
        alert_message,
    };
    Html(template.render().unwrap()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ProfileEditForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub password: Option<String>,
}

pub async fn profile_edit_handler(
    Extension(user): Extension<SessionUser>,
    State(pool): State<SqlitePool>,
    Form(form): Form<ProfileEditForm>,
) -> Response {
    let updated = identity_service::update_profile(
        &pool,
        &user.email,
        ProfileUpdateInput {
            first_name: form.first_name.as_deref(),
            last_name: form.last_name.as_deref(),
            phone: form.phone.as_deref(),
            city: form.city.as_deref(),
            state: form.state.as_deref(),
            zip: form.zip.as_deref(),
            password: form.password.as_deref(),
        },
    )
    .await;

    match updated {
        Ok(()) => Redirect::to("/profile").into_response(),
        Err(e) => {
            error!("Profile update failed for {}: {}", user.email, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn deregister_handler(
    Extension(user): Extension<SessionUser>,
    Path(registration_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match registration_service::deregister_self(&pool, registration_id, user.participant_id).await
    {
        Ok(()) => Redirect::to("/profile?msg=deregistered").into_response(),
        Err(e) => {
            warn!(
                "Deregistration of {} failed for {}: {}",
                registration_id, user.email, e
            );
            Redirect::to("/profile?msg=error").into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "add_milestone_user.html")]
pub struct AddMilestoneUserTemplate {
    pub milestones: Vec<MilestoneRow>,
    pub error: Option<&'static str>,
}

pub async fn user_milestone_page(State(pool): State<SqlitePool>) -> Response {
    match milestone_service::list_milestones(&pool, "").await {
        Ok(milestones) => {
            let template = AddMilestoneUserTemplate {
                milestones,
                error: None,
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => {
            error!("Milestone list failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserMilestoneForm {
    pub milestone_id: Option<i64>,
    pub achieved_on: Option<String>,
}

pub async fn user_milestone_handler(
    Extension(user): Extension<SessionUser>,
    State(pool): State<SqlitePool>,
    Form(form): Form<UserMilestoneForm>,
) -> Response {
    // Both a milestone and a date are required on the self-service form.
    let (Some(milestone_id), Some(achieved_on)) = (
        form.milestone_id,
        form.achieved_on.filter(|d| !d.trim().is_empty()),
    ) else {
        let milestones = match milestone_service::list_milestones(&pool, "").await {
            Ok(rows) => rows,
            Err(e) => {
                error!("Milestone list failed: {}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };
        let template = AddMilestoneUserTemplate {
            milestones,
            error: Some("Please select a milestone and a date."),
        };
        return Html(template.render().unwrap()).into_response();
    };

    match milestone_service::add_achievement(
        &pool,
        user.participant_id,
        milestone_id,
        Some(&achieved_on),
    )
    .await
    {
        Ok(_) => Redirect::to("/profile?msg=milestone").into_response(),
        Err(e) => {
            warn!("Milestone save failed for {}: {}", user.email, e);
            Redirect::to("/profile?msg=error").into_response()
        }
    }
}
