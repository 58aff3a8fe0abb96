#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventOccurrenceRow {
    pub event_occurrence_id: i64,
    pub event_template_id: i64,
    pub starts_at: String,
    pub ends_at: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i64>,
    pub registration_deadline: Option<String>,
}

/// Occurrence joined with its template name, for pickers and the calendar.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OccurrenceWithTemplateRow {
    pub event_occurrence_id: i64,
    pub event_name: String,
    pub starts_at: String,
    pub ends_at: Option<String>,
    pub location: Option<String>,
}
