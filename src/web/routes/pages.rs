use askama::Template;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use sqlx::SqlitePool;

use crate::web::access::SessionUser;
use crate::web::middleware::auth::soft_session_user;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub user: Option<SessionUser>,
}

pub async fn index_handler(State(pool): State<SqlitePool>, headers: HeaderMap) -> Html<String> {
    let user = soft_session_user(&pool, &headers).await;
    let template = IndexTemplate { user };
    Html(template.render().unwrap())
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate;

pub async fn dashboard_handler() -> Html<String> {
    Html(DashboardTemplate.render().unwrap())
}

#[derive(Template)]
#[template(path = "teapot.html")]
pub struct TeapotTemplate;

pub async fn teapot_handler() -> Response {
    (
        StatusCode::IM_A_TEAPOT,
        Html(TeapotTemplate.render().unwrap()),
    )
        .into_response()
}
