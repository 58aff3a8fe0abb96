use sqlx::SqlitePool;

use crate::database::donation_repo;
use crate::models::DonationWithDonorRow;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::identity_service;

/// Outcome of the public donation path, for the thank-you page.
pub struct RecordedDonation {
    pub donation_id: i64,
    pub participant_id: i64,
    pub donation_no: i64,
}

/// Records a donation from the public form. The donor email is resolved to
/// an existing participant or a fresh donor identity, and the donation
/// sequence number is that participant's donation count + 1 — all inside a
/// single transaction, so repeated submissions from one email can never
/// fork into duplicate identities.
pub async fn record_public_donation(
    pool: &SqlitePool,
    email: &str,
    amount: f64,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> ServiceResult<RecordedDonation> {
    if email.trim().is_empty() {
        return Err(ServiceError::Validation("email is required"));
    }
    if amount <= 0.0 {
        return Err(ServiceError::Validation("donation amount must be positive"));
    }

    let mut tx = pool.begin().await?;

    let participant_id =
        identity_service::resolve_or_create_participant(&mut tx, email, first_name, last_name)
            .await?;

    let donation_id = donation_repo::next_donation_id(&mut *tx).await?;
    let donation_no = donation_repo::next_donation_no(&mut *tx, participant_id).await?;
    donation_repo::insert_now(&mut *tx, donation_id, participant_id, amount, donation_no).await?;

    tx.commit().await?;
    Ok(RecordedDonation {
        donation_id,
        participant_id,
        donation_no,
    })
}

/// Admin entry: the participant is picked from a list, the date comes from
/// the form.
pub async fn record_admin_donation(
    pool: &SqlitePool,
    participant_id: i64,
    amount: f64,
    donated_on: &str,
) -> ServiceResult<i64> {
    if amount <= 0.0 {
        return Err(ServiceError::Validation("donation amount must be positive"));
    }

    let mut tx = pool.begin().await?;
    let donation_id = donation_repo::next_donation_id(&mut *tx).await?;
    let donation_no = donation_repo::next_donation_no(&mut *tx, participant_id).await?;
    donation_repo::insert(
        &mut *tx,
        donation_repo::NewDonation {
            donation_id,
            participant_id,
            amount,
            donated_on,
            donation_no,
        },
    )
    .await?;
    tx.commit().await?;
    Ok(donation_id)
}

pub struct DonationLedgerView {
    pub donations: Vec<DonationWithDonorRow>,
    pub grand_total: f64,
}

pub async fn load_ledger_view(pool: &SqlitePool, search: &str) -> ServiceResult<DonationLedgerView> {
    let donations = donation_repo::list_with_donors(pool, search).await?;
    let grand_total = donation_repo::grand_total(pool).await?;
    Ok(DonationLedgerView {
        donations,
        grand_total,
    })
}

pub async fn load_donation(
    pool: &SqlitePool,
    donation_id: i64,
) -> ServiceResult<Option<DonationWithDonorRow>> {
    Ok(donation_repo::load_with_donor(pool, donation_id).await?)
}

pub async fn update_donation(
    pool: &SqlitePool,
    donation_id: i64,
    amount: f64,
    donated_on: &str,
) -> ServiceResult<()> {
    let updated = donation_repo::update(pool, donation_id, amount, donated_on).await?;
    if updated == 0 {
        return Err(ServiceError::NotFound("donation record not found"));
    }
    Ok(())
}

pub async fn delete_donation(pool: &SqlitePool, donation_id: i64) -> ServiceResult<()> {
    let deleted = donation_repo::delete(pool, donation_id).await?;
    if deleted == 0 {
        return Err(ServiceError::NotFound("donation record not found"));
    }
    Ok(())
}

pub async fn total_for_participant(pool: &SqlitePool, participant_id: i64) -> ServiceResult<f64> {
    Ok(donation_repo::total_for_participant(pool, participant_id).await?)
}
