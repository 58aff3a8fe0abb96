use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{error, warn};

use crate::models::{DonationWithDonorRow, ParticipantRow};
use crate::services::donation_service;
use crate::services::error::ServiceError;
use crate::services::identity_service;
use crate::web::access::SessionUser;
use crate::web::middleware::auth::soft_session_user;

/// The donate page is public; when a session cookie happens to be present
/// the form is prefilled with the visitor's identity.
#[derive(Template)]
#[template(path = "donate.html")]
pub struct DonateTemplate {
    pub user: Option<SessionUser>,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
}

pub async fn donate_page(State(pool): State<SqlitePool>, headers: HeaderMap) -> Html<String> {
    let user = soft_session_user(&pool, &headers).await;
    let template = DonateTemplate {
        user,
        notice: None,
        error: None,
    };
    Html(template.render().unwrap())
}

#[derive(Debug, Deserialize)]
pub struct DonateForm {
    pub email: String,
    pub amount: f64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn donate_handler(
    State(pool): State<SqlitePool>,
    headers: HeaderMap,
    Form(form): Form<DonateForm>,
) -> Response {
    let recorded = donation_service::record_public_donation(
        &pool,
        &form.email,
        form.amount,
        form.first_name.as_deref(),
        form.last_name.as_deref(),
    )
    .await;

    match recorded {
        Ok(_) => {
            let template = DonateTemplate {
                user: None,
                notice: Some("Thank you for your generous donation!"),
                error: None,
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(ServiceError::Validation(msg)) => {
            let user = soft_session_user(&pool, &headers).await;
            let template = DonateTemplate {
                user,
                notice: None,
                error: Some(msg.to_string()),
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => {
            error!("Donation from {} failed: {}", form.email, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error processing donation.").into_response()
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Template)]
#[template(path = "view_donations.html")]
pub struct ViewDonationsTemplate {
    pub donations: Vec<DonationWithDonorRow>,
    pub search: String,
    pub grand_total: f64,
}

pub async fn admin_donations_handler(
    Query(query): Query<SearchQuery>,
    State(pool): State<SqlitePool>,
) -> Response {
    let search = query.search.unwrap_or_default();
    match donation_service::load_ledger_view(&pool, &search).await {
        Ok(view) => {
            let template = ViewDonationsTemplate {
                donations: view.donations,
                search,
                grand_total: view.grand_total,
            };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => {
            error!("Donation list failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "add_donation.html")]
pub struct AddDonationTemplate {
    pub participants: Vec<ParticipantRow>,
}

pub async fn add_donation_page(State(pool): State<SqlitePool>) -> Response {
    match identity_service::list_participants_by_first_name(&pool).await {
        Ok(participants) => {
            let template = AddDonationTemplate { participants };
            Html(template.render().unwrap()).into_response()
        }
        Err(e) => {
            error!("Donation add page failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddDonationForm {
    pub participant_id: i64,
    pub amount: f64,
    pub donated_on: String,
}

pub async fn add_donation_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<AddDonationForm>,
) -> Response {
    match donation_service::record_admin_donation(
        &pool,
        form.participant_id,
        form.amount,
        &form.donated_on,
    )
    .await
    {
        Ok(_) => Redirect::to("/admin/donations").into_response(),
        Err(e) => {
            error!("Donation creation failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error adding donation.").into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "edit_donation.html")]
pub struct EditDonationTemplate {
    pub donation: DonationWithDonorRow,
}

pub async fn edit_donation_page(
    Path(donation_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match donation_service::load_donation(&pool, donation_id).await {
        Ok(Some(donation)) => {
            let template = EditDonationTemplate { donation };
            Html(template.render().unwrap()).into_response()
        }
        Ok(None) => Redirect::to("/admin/donations").into_response(),
        Err(e) => {
            error!("Donation load failed for {}: {}", donation_id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EditDonationForm {
    pub amount: f64,
    pub donated_on: String,
}

pub async fn edit_donation_handler(
    Path(donation_id): Path<i64>,
    State(pool): State<SqlitePool>,
    Form(form): Form<EditDonationForm>,
) -> Response {
    match donation_service::update_donation(&pool, donation_id, form.amount, &form.donated_on)
        .await
    {
        Ok(()) => Redirect::to("/admin/donations").into_response(),
        Err(e) => {
            error!("Donation update failed for {}: {}", donation_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error updating donation.").into_response()
        }
    }
}

pub async fn delete_donation_handler(
    Path(donation_id): Path<i64>,
    State(pool): State<SqlitePool>,
) -> Response {
    match donation_service::delete_donation(&pool, donation_id).await {
        Ok(()) => Redirect::to("/admin/donations").into_response(),
        Err(e) => {
            warn!("Donation delete failed for {}: {}", donation_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error deleting donation.").into_response()
        }
    }
}
