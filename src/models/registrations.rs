#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RegistrationRow {
    pub registration_id: i64,
    pub participant_id: i64,
    pub event_occurrence_id: i64,
    pub created_at: String,
    pub status: String,
    pub attended: Option<i64>,
    pub checkin_time: Option<String>,
}

/// Registration joined with occurrence and template, as shown on the profile
/// and participant-detail pages.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RegistrationWithEventRow {
    pub registration_id: i64,
    pub event_name: String,
    pub event_type: Option<String>,
    pub starts_at: String,
    pub location: Option<String>,
    pub status: String,
}
