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

use crate::models::{MilestoneAchieverRow, MilestoneRow};
use crate::services::milestone_service;
use crate::web::access::SessionUser;
use crate::web::routes::ErrorTemplate;

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Template)]
#[template(path = "milestones.html")]
pub struct MilestonesTemplate {
    pub milestones: Vec<MilestoneRow>,
    pub search: String,
    pub total_achieved: i64,
    pub can_manage: bool,
}

pub async fn milestones_handler(
    Extension(user): Extension<SessionUser>,
    Query(query): Query<SearchQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    let search = query.search.unwrap_or_default();

    let milestones = match milestone_service::list_milestones(&pool, &search).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Milestone list failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let total_achieved = match milestone_service::total_achievements(&pool).await {
        Ok(count) => count,
        Err(e) => {
            error!("Achievement count failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = MilestonesTemplate {
        milestones,
        search,
        total_achieved,
        can_manage: user.is_elevated(),
    };
    Html(template.render().unwrap()).into_response()
}

#[derive(Template)]
#[template(path = "milestone_detail.html")]
pub struct MilestoneDetailTemplate {
    pub milestone: MilestoneRow,
    pub achievers: Vec<MilestoneAchieverRow>,
}

pub async fn milestone_detail_handler(
    Path(milestone_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    let milestone = match milestone_service::load_milestone(&pool, milestone_id).await {
        Ok(Some(row)) => row,
        Ok(None) => return (StatusCode::NOT_FOUND, "Milestone not found.").into_response(),
        Err(e) => {
            error!("Milestone load failed for {}: {}", milestone_id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let achievers = match milestone_service::list_achievers(&pool, milestone_id).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Achiever list failed for {}: {}", milestone_id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = MilestoneDetailTemplate {
        milestone,
        achievers,
    };
    Html(template.render().unwrap()).into_response()
}

#[derive(Template)]
#[template(path = "add_milestone.html")]
pub struct AddMilestoneTemplate;

pub async fn add_milestone_page() -> Html<String> {
    Html(AddMilestoneTemplate.render().unwrap())
}

#[derive(Debug, Deserialize)]
pub struct MilestoneForm {
    pub title: String,
}

pub async fn add_milestone_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<MilestoneForm>,
) -> Response {
    match milestone_service::create_milestone(&pool, &form.title).await {
        Ok(_) => Redirect::to("/milestones").into_response(),
        Err(e) => {
            error!("Milestone creation failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error adding milestone.").into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "edit_milestone.html")]
pub struct EditMilestoneTemplate {
    pub milestone: MilestoneRow,
}

pub async fn edit_milestone_page(
    Path(milestone_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match milestone_service::load_milestone(&pool, milestone_id).await {
        Ok(Some(milestone)) => {
            let template = EditMilestoneTemplate { milestone };
            Html(template.render().unwrap()).into_response()
        }
        Ok(None) => Redirect::to("/milestones").into_response(),
        Err(e) => {
            error!("Milestone load failed for {}: {}", milestone_id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn edit_milestone_handler(
    Path(milestone_id): Path<i64>,
    State(pool): State<SqlitePool>,
    Form(form): Form<MilestoneForm>,
) -> Response {
    match milestone_service::rename_milestone(&pool, milestone_id, &form.title).await {
        Ok(()) => Redirect::to("/milestones").into_response(),
        Err(e) => {
            error!("Milestone update failed for {}: {}", milestone_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error updating milestone.").into_response()
        }
    }
}

pub async fn delete_milestone_handler(
    Path(milestone_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match milestone_service::delete_milestone(&pool, milestone_id).await {
        Ok(()) => Redirect::to("/milestones").into_response(),
        Err(e) => {
            warn!("Milestone delete failed for {}: {}", milestone_id, e);
            let template = ErrorTemplate {
                message: "Error deleting milestone. It may be assigned to participants."
                    .to_string(),
            };
            Html(template.render().unwrap()).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminAchievementForm {
    pub participant_id: i64,
    pub milestone_id: i64,
    pub achieved_on: Option<String>,
}

pub async fn admin_achievement_add(
    State(pool): State<SqlitePool>,
    Form(form): Form<AdminAchievementForm>,
) -> Response {
    let back = format!("/users/view/{}", form.participant_id);
    let achieved_on = form.achieved_on.as_deref().filter(|d| !d.trim().is_empty());

    match milestone_service::add_achievement(
        &pool,
        form.participant_id,
        form.milestone_id,
        achieved_on,
    )
    .await
    {
        Ok(_) => Redirect::to(&back).into_response(),
        Err(e) => {
            warn!(
                "Achievement add failed for participant {}: {}",
                form.participant_id, e
            );
            Redirect::to(&back).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminAchievementEditForm {
    pub participant_id: i64,
    pub milestone_id: i64,
    pub achieved_on: Option<String>,
}

pub async fn admin_achievement_edit(
    Path(participant_milestone_id): Path<i64>,
    State(pool): State<SqlitePool>,
    Form(form): Form<AdminAchievementEditForm>,
) -> Response {
    let back = format!("/users/view/{}", form.participant_id);
    let achieved_on = form.achieved_on.as_deref().filter(|d| !d.trim().is_empty());

    match milestone_service::edit_achievement(
        &pool,
        participant_milestone_id,
        form.milestone_id,
        achieved_on,
    )
    .await
    {
        Ok(()) => Redirect::to(&back).into_response(),
        Err(e) => {
            warn!(
                "Achievement edit failed for {}: {}",
                participant_milestone_id, e
            );
            Redirect::to(&back).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminAchievementDeleteQuery {
    pub participant: i64,
}

pub async fn admin_achievement_delete(
    Path(participant_milestone_id): Path<i64>,
    Query(query): Query<AdminAchievementDeleteQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    let back = format!("/users/view/{}", query.participant);

    match milestone_service::delete_achievement(&pool, participant_milestone_id).await {
        Ok(()) => Redirect::to(&back).into_response(),
        Err(e) => {
            warn!(
                "Achievement delete failed for {}: {}",
                participant_milestone_id, e
            );
            Redirect::to(&back).into_response()
        }
    }
}
