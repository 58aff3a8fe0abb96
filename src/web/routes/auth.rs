use askama::Template;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use cookie::Cookie;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{error, warn};

use crate::models::Role;
use crate::services::error::ServiceError;
use crate::services::identity_service;
use crate::web::middleware::auth::SESSION_COOKIE;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LoginQuery {
    pub msg: Option<String>,
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    let notice = match query.msg.as_deref() {
        Some("created") => Some("Account created successfully! Please login.".to_string()),
        _ => None,
    };
    let template = LoginTemplate {
        error: None,
        notice,
    };
    Html(template.render().unwrap())
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

fn login_error(message: &str) -> Response {
    let template = LoginTemplate {
        error: Some(message.to_string()),
        notice: None,
    };
    Html(template.render().unwrap()).into_response()
}

pub async fn login_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<LoginForm>,
) -> Response {
    let participant = match identity_service::authenticate(&pool, &form.email, &form.password).await
    {
        Ok(Some(p)) => p,
        Ok(None) => return login_error("Invalid email or password."),
        Err(e) => {
            error!("Login lookup failed for {}: {}", form.email, e);
            return login_error("Database error.");
        }
    };

    let session_id = match identity_service::open_session(&pool, participant.participant_id).await {
        Ok(id) => id,
        Err(e) => {
            error!("Session open failed for {}: {}", form.email, e);
            return login_error("Database error.");
        }
    };

    let mut session_cookie = Cookie::new(SESSION_COOKIE, session_id);
    session_cookie.set_path("/");
    session_cookie.set_http_only(true);
    session_cookie.set_same_site(cookie::SameSite::Lax);

    let mut response = Redirect::to("/").into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        session_cookie.to_string().parse().unwrap(),
    );
    response
}

pub async fn logout_handler(State(pool): State<SqlitePool>, headers: HeaderMap) -> Response {
    let session_id = headers
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find(|c| c.starts_with("session_id="))
                .and_then(|c| c.strip_prefix("session_id="))
        });

    if let Some(session_id) = session_id {
        if let Err(e) = identity_service::close_session(&pool, session_id).await {
            warn!("Session close failed: {}", e);
        }
    }

    let mut session_cookie = Cookie::new(SESSION_COOKIE, "");
    session_cookie.set_path("/");
    session_cookie.set_http_only(true);
    session_cookie.set_same_site(cookie::SameSite::Lax);

    let mut response = Redirect::to("/").into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        session_cookie.to_string().parse().unwrap(),
    );
    response
}

#[derive(Template)]
#[template(path = "create_user.html")]
pub struct CreateUserTemplate {
    pub error: Option<String>,
}

pub async fn create_user_page() -> Html<String> {
    let template = CreateUserTemplate { error: None };
    Html(template.render().unwrap())
}

#[derive(Deserialize)]
pub struct CreateUserForm {
    #[serde(rename = "firstName")]
    first_name: String,
    #[serde(rename = "lastName")]
    last_name: String,
    email: String,
    password: String,
}

pub async fn create_user_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<CreateUserForm>,
) -> Response {
    // Self sign-up always lands on the participant role; roles are assigned
    // by admins through the user maintenance pages.
    let created = identity_service::create_participant(
        &pool,
        identity_service::NewParticipantInput {
            email: &form.email,
            password: Some(&form.password),
            first_name: Some(&form.first_name),
            last_name: Some(&form.last_name),
            phone: None,
            city: None,
            state: None,
            zip: None,
            role: Role::Participant,
        },
    )
    .await;

    match created {
        Ok(_) => Redirect::to("/login?msg=created").into_response(),
        Err(ServiceError::Conflict(_)) => {
            let template = CreateUserTemplate {
                error: Some("An account with this email already exists.".to_string()),
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(ServiceError::Validation(msg)) => {
            let template = CreateUserTemplate {
                error: Some(msg.to_string()),
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => {
            error!("Account creation failed: {}", e);
            let template = CreateUserTemplate {
                error: Some("Error creating account.".to_string()),
            };
            Html(template.render().unwrap()).into_response()
        }
    }
}
