use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;

use crate::database::session_repo;
use crate::web::access::{self, Capability, Decision, SessionUser};

pub const SESSION_COOKIE: &str = "session_id";

fn session_id_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find(|c| c.starts_with("session_id="))
                .and_then(|c| c.strip_prefix("session_id="))
        })
}

/// Best-effort session resolution for public pages that personalize when the
/// visitor happens to be logged in. Never denies.
pub async fn soft_session_user(pool: &SqlitePool, headers: &HeaderMap) -> Option<SessionUser> {
    let session_id = session_id_from_headers(headers)?;
    session_repo::load_session_participant(pool, session_id)
        .await
        .ok()
        .flatten()
        .map(|row| SessionUser::from_row(&row))
}

/// Resolves the session cookie to a participant and injects a `SessionUser`
/// extension. Requests without a live session are redirected to the login
/// page before any handler runs.
pub async fn require_session(
    State(pool): State<SqlitePool>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = soft_session_user(&pool, request.headers()).await;
    match access::decide(user.as_ref(), Capability::Authenticated) {
        Decision::Allow => {
            request.extensions_mut().insert(user.unwrap());
            next.run(request).await
        }
        Decision::Deny(_) => Redirect::to("/login").into_response(),
    }
}

/// Manager/admin gate. Denial is a terminal 403 with no redirect, whether
/// the request is unauthenticated or merely unelevated.
pub async fn require_elevated(
    State(pool): State<SqlitePool>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = soft_session_user(&pool, request.headers()).await;
    match access::decide(user.as_ref(), Capability::Elevated) {
        Decision::Allow => {
            request.extensions_mut().insert(user.unwrap());
            next.run(request).await
        }
        Decision::Deny(_) => Response::builder()
            .status(403)
            .body(Body::from("Access Denied."))
            .unwrap(),
    }
}
