mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware,
    routing::post,
    Router,
};
use sqlx::SqlitePool;
use tower::ServiceExt;

use ella_rises::models::Role;
use ella_rises::services::identity_service;
use ella_rises::web::middleware::auth as auth_middleware;

use common::{seed_participant, test_pool};

/// Minimal router with one handler per capability tier, gated exactly the
/// way the real application wires its route groups.
fn gated_app(pool: &SqlitePool) -> Router {
    let session_routes = Router::new()
        .route("/mutate", post(|| async { "ok" }))
        .layer(middleware::from_fn_with_state(
            pool.clone(),
            auth_middleware::require_session,
        ));
    let elevated_routes = Router::new()
        .route("/admin/mutate", post(|| async { "ok" }))
        .layer(middleware::from_fn_with_state(
            pool.clone(),
            auth_middleware::require_elevated,
        ));
    Router::new().merge(session_routes).merge(elevated_routes)
}

fn post_request(uri: &str, session_id: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(session_id) = session_id {
        builder = builder.header(header::COOKIE, format!("session_id={}", session_id));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn unauthenticated_requests_to_elevated_routes_get_a_terminal_403() {
    let pool = test_pool().await;
    let app = gated_app(&pool);

    let response = app.oneshot(post_request("/admin/mutate", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::LOCATION).is_none());
}

#[tokio::test]
async fn unauthenticated_requests_to_session_routes_redirect_to_login() {
    let pool = test_pool().await;
    let app = gated_app(&pool);

    let response = app.oneshot(post_request("/mutate", None)).await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login"
    );
}

#[tokio::test]
async fn a_participant_session_passes_the_authenticated_tier_only() {
    let pool = test_pool().await;
    let participant_id = seed_participant(&pool, "p@example.org", Role::Participant).await;
    let session_id = identity_service::open_session(&pool, participant_id).await.unwrap();
    let app = gated_app(&pool);

    let ok = app
        .clone()
        .oneshot(post_request("/mutate", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let denied = app
        .oneshot(post_request("/admin/mutate", Some(&session_id)))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn manager_and_admin_sessions_pass_the_elevated_tier() {
    let pool = test_pool().await;
    let manager = seed_participant(&pool, "m@example.org", Role::Manager).await;
    let admin = seed_participant(&pool, "a@example.org", Role::Admin).await;
    let app = gated_app(&pool);

    for participant_id in [manager, admin] {
        let session_id = identity_service::open_session(&pool, participant_id).await.unwrap();
        let response = app
            .clone()
            .oneshot(post_request("/admin/mutate", Some(&session_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn a_stale_session_cookie_is_rejected() {
    let pool = test_pool().await;
    let participant_id = seed_participant(&pool, "p@example.org", Role::Participant).await;
    let session_id = identity_service::open_session(&pool, participant_id).await.unwrap();
    identity_service::close_session(&pool, &session_id).await.unwrap();
    let app = gated_app(&pool);

    let response = app
        .oneshot(post_request("/mutate", Some(&session_id)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
}
