use axum::{
    middleware,
    routing::{get, get_service, post},
    Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};

use ella_rises::web::middleware::auth as auth_middleware;
use ella_rises::web::routes::{
    auth, donations, events, milestones, pages, profile, surveys, users,
};

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt::init();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    info!("Connecting to database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Cannot connect to database");

    // Routes for any logged-in participant.
    let session_routes = Router::new()
        .route("/profile", get(profile::profile_handler))
        .route("/profile/edit", post(profile::profile_edit_handler))
        .route(
            "/profile/deregister/:registration_id",
            post(profile::deregister_handler),
        )
        .route(
            "/user/milestones/add",
            get(profile::user_milestone_page).post(profile::user_milestone_handler),
        )
        .route("/events", get(events::events_handler))
        .route(
            "/events/addDate",
            get(events::add_date_page).post(events::add_date_handler),
        )
        .route(
            "/events/register/:template_id",
            post(events::register_template_handler),
        )
        .route(
            "/events/registerOccurrence/:occurrence_id",
            post(events::register_occurrence_handler),
        )
        .route("/events/calendar/:template_id", get(events::calendar_page))
        .route(
            "/events/calendarData/:template_id",
            get(events::calendar_data),
        )
        .route("/milestones", get(milestones::milestones_handler))
        .route(
            "/milestones/view/:milestone_id",
            get(milestones::milestone_detail_handler),
        )
        .route("/surveys", get(surveys::surveys_handler))
        .route("/surveys/:survey_id", get(surveys::survey_detail_handler))
        .route("/surveyUser", get(surveys::user_surveys_handler))
        .route(
            "/surveyUser/:survey_id",
            get(surveys::user_survey_detail_handler),
        )
        .route(
            "/testSurvey",
            get(surveys::test_survey_page).post(surveys::test_survey_handler),
        );

    // Manager/admin tier. The gate resolves the session itself and answers
    // every denial with a terminal 403.
    let elevated_routes = Router::new()
        .route("/participants", get(users::participants_handler))
        .route(
            "/participants/add",
            get(users::add_participant_page).post(users::add_participant_handler),
        )
        .route(
            "/participants/delete/:participant_id",
            post(users::delete_participant_handler),
        )
        .route("/users", get(users::users_handler))
        .route("/users/view/:participant_id", get(users::user_detail_handler))
        .route(
            "/users/add",
            get(users::add_user_page).post(users::add_user_handler),
        )
        .route(
            "/users/delete/:participant_id",
            post(users::delete_user_handler),
        )
        .route(
            "/users/deregister/:registration_id",
            post(users::admin_deregister_handler),
        )
        .route(
            "/admin/register-event",
            get(users::admin_register_page).post(users::admin_register_handler),
        )
        .route(
            "/events/add",
            get(events::add_event_page).post(events::add_event_handler),
        )
        .route(
            "/events/edit/:template_id",
            get(events::edit_event_page).post(events::edit_event_handler),
        )
        .route(
            "/events/delete/:template_id",
            post(events::delete_event_handler),
        )
        .route(
            "/milestones/add",
            get(milestones::add_milestone_page).post(milestones::add_milestone_handler),
        )
        .route(
            "/milestones/edit/:milestone_id",
            get(milestones::edit_milestone_page).post(milestones::edit_milestone_handler),
        )
        .route(
            "/milestones/delete/:milestone_id",
            post(milestones::delete_milestone_handler),
        )
        .route(
            "/admin/milestones/add",
            post(milestones::admin_achievement_add),
        )
        .route(
            "/admin/milestones/edit/:participant_milestone_id",
            post(milestones::admin_achievement_edit),
        )
        .route(
            "/admin/milestones/delete/:participant_milestone_id",
            post(milestones::admin_achievement_delete),
        )
        .route("/admin/donations", get(donations::admin_donations_handler))
        .route(
            "/admin/donations/add",
            get(donations::add_donation_page).post(donations::add_donation_handler),
        )
        .route(
            "/admin/donations/edit/:donation_id",
            get(donations::edit_donation_page).post(donations::edit_donation_handler),
        )
        .route(
            "/admin/donations/delete/:donation_id",
            post(donations::delete_donation_handler),
        )
        .route("/dashboard", get(pages::dashboard_handler))
        .layer(middleware::from_fn_with_state(
            pool.clone(),
            auth_middleware::require_elevated,
        ));

    let protected_routes = session_routes
        .layer(middleware::from_fn_with_state(
            pool.clone(),
            auth_middleware::require_session,
        ))
        .merge(elevated_routes);

    let app = Router::new()
        // Public routes
        .route("/", get(pages::index_handler))
        .route("/login", get(auth::login_page).post(auth::login_handler))
        .route("/logout", get(auth::logout_handler))
        .route(
            "/createUser",
            get(auth::create_user_page).post(auth::create_user_handler),
        )
        .route(
            "/donate",
            get(donations::donate_page).post(donations::donate_handler),
        )
        .route("/teapot", get(pages::teapot_handler))
        // Protected routes
        .merge(protected_routes)
        // Static files
        .nest_service(
            "/assets",
            get_service(ServeDir::new("assets")).layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
        )
        // Layers
        .layer(CatchPanicLayer::new())
        // State
        .with_state(pool);

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Cannot parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            warn!("Could not bind {}: {}. Trying {}:{}", addr, e, host, port + 1);
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("Cannot parse fallback address");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Cannot bind fallback port")
        }
    };

    info!("Server running on http://{}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
