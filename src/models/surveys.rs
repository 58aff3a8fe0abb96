/// Survey submission joined with respondent and event, for the admin list.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SurveyListRow {
    pub participant_survey_id: i64,
    pub submitted_on: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub event_name: String,
    pub event_date: String,
}

/// Submission header for the detail page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SurveyHeaderRow {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub event_name: String,
    pub event_date: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SurveyAnswerRow {
    pub question: String,
    pub response: Option<String>,
}

/// A participant's own submission, without the identity columns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSurveyRow {
    pub participant_survey_id: i64,
    pub submitted_on: String,
    pub event_name: String,
    pub event_date: String,
}
