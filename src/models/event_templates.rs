#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventTemplateRow {
    pub event_template_id: i64,
    pub name: String,
    pub event_type: Option<String>,
    pub recurrence_pattern: Option<String>,
    pub description: Option<String>,
    pub default_capacity: Option<i64>,
}
