use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::error;

use crate::models::{SurveyListRow, UserSurveyRow};
use crate::services::survey_service::{self, OwnSurveyDetailView, SurveyDetailView};
use crate::web::access::SessionUser;

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Template)]
#[template(path = "surveys.html")]
pub struct SurveysTemplate {
    pub surveys: Vec<SurveyListRow>,
    pub search: String,
}

pub async fn surveys_handler(
    Query(query): Query<SearchQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    let search = query.search.unwrap_or_default();
    match survey_service::list_surveys(&pool, &search).await {
        Ok(surveys) => {
            let template = SurveysTemplate { surveys, search };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => {
            error!("Survey list failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "survey_detail.html")]
pub struct SurveyDetailTemplate {
    pub detail: SurveyDetailView,
}

pub async fn survey_detail_handler(
    Path(survey_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match survey_service::load_survey_detail(&pool, survey_id).await {
        Ok(Some(detail)) => {
            let template = SurveyDetailTemplate { detail };
            Html(template.render().unwrap()).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "Survey not found.").into_response(),
        Err(e) => {
            error!("Survey detail failed for {}: {}", survey_id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "survey_user.html")]
pub struct UserSurveysTemplate {
    pub surveys: Vec<UserSurveyRow>,
    pub search: String,
}

pub async fn user_surveys_handler(
    Extension(user): Extension<SessionUser>,
    Query(query): Query<SearchQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    let search = query.search.unwrap_or_default();
    match survey_service::list_own_surveys(&pool, user.participant_id, &search).await {
        Ok(surveys) => {
            let template = UserSurveysTemplate { surveys, search };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => {
            error!("Own survey list failed for {}: {}", user.email, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "survey_user_detail.html")]
pub struct UserSurveyDetailTemplate {
    pub detail: OwnSurveyDetailView,
}

pub async fn user_survey_detail_handler(
    Extension(user): Extension<SessionUser>,
    Path(survey_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match survey_service::load_own_survey_detail(&pool, survey_id, user.participant_id).await {
        Ok(Some(detail)) => {
            let template = UserSurveyDetailTemplate { detail };
            Html(template.render().unwrap()).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "Survey not found.").into_response(),
        Err(e) => {
            error!("Own survey detail failed for {}: {}", survey_id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "test_survey.html")]
pub struct TestSurveyTemplate {
    pub return_url: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct TestSurveyQuery {
    pub return_url: Option<String>,
}

/// Development-only preview; submissions are not stored.
pub async fn test_survey_page(Query(query): Query<TestSurveyQuery>) -> Html<String> {
    let template = TestSurveyTemplate {
        return_url: query.return_url.unwrap_or_else(|| "/profile".to_string()),
    };
    Html(template.render().unwrap())
}

#[derive(Debug, Deserialize)]
pub struct TestSurveyForm {
    pub return_url: Option<String>,
}

pub async fn test_survey_handler(Form(form): Form<TestSurveyForm>) -> Response {
    let target = form
        .return_url
        .as_deref()
        .filter(|s| s.starts_with('/') && !s.starts_with("//") && !s.contains("://"))
        .unwrap_or("/profile");
    Redirect::to(target).into_response()
}
