#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationRow {
    pub donation_id: i64,
    pub participant_id: i64,
    pub amount: f64,
    pub donated_on: String,
    pub donation_no: i64,
}

/// Donation joined with donor identity, for the admin ledger.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationWithDonorRow {
    pub donation_id: i64,
    pub participant_id: i64,
    pub amount: f64,
    pub donated_on: String,
    pub donation_no: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
