use sqlx::SqlitePool;

use crate::database::{donation_repo, milestone_repo, participant_milestone_repo, participant_repo, registration_repo};
use crate::models::{
    AchievementWithTitleRow, DonationRow, MilestoneRow, ParticipantRow, RegistrationWithEventRow,
};
use crate::services::error::ServiceResult;

/// Everything the profile page shows for the logged-in participant.
pub struct ProfileView {
    pub participant: ParticipantRow,
    pub milestones: Vec<AchievementWithTitleRow>,
    pub donations: Vec<DonationRow>,
    pub donation_total: f64,
    pub upcoming: Vec<RegistrationWithEventRow>,
    pub past: Vec<RegistrationWithEventRow>,
}

pub async fn load_profile_view(
    pool: &SqlitePool,
    email: &str,
) -> ServiceResult<Option<ProfileView>> {
    let Some(participant) = participant_repo::load_by_email(pool, email).await? else {
        return Ok(None);
    };

    let participant_id = participant.participant_id;
    let milestones = participant_milestone_repo::list_for_participant(pool, participant_id).await?;
    let donations = donation_repo::list_for_participant(pool, participant_id).await?;
    let donation_total = donation_repo::total_for_participant(pool, participant_id).await?;
    let upcoming = registration_repo::list_upcoming(pool, participant_id).await?;
    let past = registration_repo::list_past(pool, participant_id).await?;

    Ok(Some(ProfileView {
        participant,
        milestones,
        donations,
        donation_total,
        upcoming,
        past,
    }))
}

/// The admin participant-detail page: profile plus registrations,
/// achievements and donations, and the milestone catalogue for the inline
/// add/edit forms.
pub struct ParticipantDetailView {
    pub participant: ParticipantRow,
    pub upcoming: Vec<RegistrationWithEventRow>,
    pub milestones: Vec<AchievementWithTitleRow>,
    pub all_milestones: Vec<MilestoneRow>,
    pub donations: Vec<DonationRow>,
    pub donation_total: f64,
}

pub async fn load_participant_detail(
    pool: &SqlitePool,
    participant_id: i64,
) -> ServiceResult<Option<ParticipantDetailView>> {
    let Some(participant) = participant_repo::load_by_id(pool, participant_id).await? else {
        return Ok(None);
    };

    let upcoming = registration_repo::list_upcoming(pool, participant_id).await?;
    let milestones = participant_milestone_repo::list_for_participant(pool, participant_id).await?;
    let all_milestones = milestone_repo::list(pool, "").await?;
    let donations = donation_repo::list_for_participant(pool, participant_id).await?;
    let donation_total = donation_repo::total_for_participant(pool, participant_id).await?;

    Ok(Some(ParticipantDetailView {
        participant,
        upcoming,
        milestones,
        all_milestones,
        donations,
        donation_total,
    }))
}
