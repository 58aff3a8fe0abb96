use sqlx::SqlitePool;

use crate::database::survey_repo;
use crate::models::{SurveyAnswerRow, SurveyHeaderRow, SurveyListRow, UserSurveyRow};
use crate::services::error::ServiceResult;

pub async fn list_surveys(pool: &SqlitePool, search: &str) -> ServiceResult<Vec<SurveyListRow>> {
    Ok(survey_repo::list(pool, search).await?)
}

pub struct SurveyDetailView {
    pub header: SurveyHeaderRow,
    pub answers: Vec<SurveyAnswerRow>,
}

pub async fn load_survey_detail(
    pool: &SqlitePool,
    survey_id: i64,
) -> ServiceResult<Option<SurveyDetailView>> {
    let Some(header) = survey_repo::load_header(pool, survey_id).await? else {
        return Ok(None);
    };
    let answers = survey_repo::list_answers(pool, survey_id).await?;
    Ok(Some(SurveyDetailView { header, answers }))
}

pub async fn list_own_surveys(
    pool: &SqlitePool,
    participant_id: i64,
    search: &str,
) -> ServiceResult<Vec<UserSurveyRow>> {
    Ok(survey_repo::list_for_participant(pool, participant_id, search).await?)
}

pub struct OwnSurveyDetailView {
    pub header: UserSurveyRow,
    pub answers: Vec<SurveyAnswerRow>,
}

pub async fn load_own_survey_detail(
    pool: &SqlitePool,
    survey_id: i64,
    participant_id: i64,
) -> ServiceResult<Option<OwnSurveyDetailView>> {
    let Some(header) =
        survey_repo::load_header_for_participant(pool, survey_id, participant_id).await?
    else {
        return Ok(None);
    };
    let answers = survey_repo::list_answers(pool, survey_id).await?;
    Ok(Some(OwnSurveyDetailView { header, answers }))
}
