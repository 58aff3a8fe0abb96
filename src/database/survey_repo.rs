use sqlx::{Executor, Sqlite};

use crate::models::{SurveyAnswerRow, SurveyHeaderRow, SurveyListRow, UserSurveyRow};

const SQL_LIST: &str = r#"
SELECT
    ps.participant_survey_id,
    ps.submitted_on,
    p.first_name,
    p.last_name,
    et.name AS event_name,
    eo.starts_at AS event_date
FROM participant_surveys ps
JOIN participants p ON p.participant_id = ps.participant_id
JOIN event_occurrences eo ON eo.event_occurrence_id = ps.event_occurrence_id
JOIN event_templates et ON et.event_template_id = eo.event_template_id
WHERE ?1 = ''
   OR p.first_name LIKE '%' || ?1 || '%'
   OR p.last_name LIKE '%' || ?1 || '%'
   OR et.name LIKE '%' || ?1 || '%'
ORDER BY ps.submitted_on DESC
"#;

const SQL_LOAD_HEADER: &str = r#"
SELECT
    p.first_name,
    p.last_name,
    et.name AS event_name,
    eo.starts_at AS event_date
FROM participant_surveys ps
JOIN participants p ON p.participant_id = ps.participant_id
JOIN event_occurrences eo ON eo.event_occurrence_id = ps.event_occurrence_id
JOIN event_templates et ON et.event_template_id = eo.event_template_id
WHERE ps.participant_survey_id = ?1
LIMIT 1
"#;

const SQL_LIST_ANSWERS: &str = r#"
SELECT
    sq.question,
    sr.response
FROM survey_responses sr
JOIN survey_questions sq ON sq.question_id = sr.question_id
WHERE sr.participant_survey_id = ?1
ORDER BY sq.question_id
"#;

const SQL_LIST_FOR_PARTICIPANT: &str = r#"
SELECT
    ps.participant_survey_id,
    ps.submitted_on,
    et.name AS event_name,
    eo.starts_at AS event_date
FROM participant_surveys ps
JOIN event_occurrences eo ON eo.event_occurrence_id = ps.event_occurrence_id
JOIN event_templates et ON et.event_template_id = eo.event_template_id
WHERE ps.participant_id = ?1
  AND (?2 = '' OR et.name LIKE '%' || ?2 || '%')
ORDER BY ps.submitted_on DESC
"#;

const SQL_LOAD_HEADER_FOR_PARTICIPANT: &str = r#"
SELECT
    ps.participant_survey_id,
    ps.submitted_on,
    et.name AS event_name,
    eo.starts_at AS event_date
FROM participant_surveys ps
JOIN event_occurrences eo ON eo.event_occurrence_id = ps.event_occurrence_id
JOIN event_templates et ON et.event_template_id = eo.event_template_id
WHERE ps.participant_survey_id = ?1
  AND ps.participant_id = ?2
LIMIT 1
"#;

pub async fn list<'e, E>(ex: E, search: &str) -> sqlx::Result<Vec<SurveyListRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, SurveyListRow>(SQL_LIST)
        .bind(search)
        .fetch_all(ex)
        .await
}

pub async fn load_header<'e, E>(ex: E, survey_id: i64) -> sqlx::Result<Option<SurveyHeaderRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, SurveyHeaderRow>(SQL_LOAD_HEADER)
        .bind(survey_id)
        .fetch_optional(ex)
        .await
}

pub async fn list_answers<'e, E>(ex: E, survey_id: i64) -> sqlx::Result<Vec<SurveyAnswerRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, SurveyAnswerRow>(SQL_LIST_ANSWERS)
        .bind(survey_id)
        .fetch_all(ex)
        .await
}

pub async fn list_for_participant<'e, E>(
    ex: E,
    participant_id: i64,
    search: &str,
) -> sqlx::Result<Vec<UserSurveyRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, UserSurveyRow>(SQL_LIST_FOR_PARTICIPANT)
        .bind(participant_id)
        .bind(search)
        .fetch_all(ex)
        .await
}

/// Scoped to the owning participant so one user cannot read another's
/// submission by guessing identifiers.
pub async fn load_header_for_participant<'e, E>(
    ex: E,
    survey_id: i64,
    participant_id: i64,
) -> sqlx::Result<Option<UserSurveyRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, UserSurveyRow>(SQL_LOAD_HEADER_FOR_PARTICIPANT)
        .bind(survey_id)
        .bind(participant_id)
        .fetch_optional(ex)
        .await
}
