#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MilestoneRow {
    pub milestone_id: i64,
    pub title: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantMilestoneRow {
    pub participant_milestone_id: i64,
    pub participant_id: i64,
    pub milestone_id: i64,
    pub achieved_on: Option<String>,
    pub milestone_no: i64,
}

/// Achievement joined with its milestone title.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AchievementWithTitleRow {
    pub participant_milestone_id: i64,
    pub milestone_id: i64,
    pub title: String,
    pub achieved_on: Option<String>,
    pub milestone_no: i64,
}

/// One participant who achieved a given milestone.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MilestoneAchieverRow {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub achieved_on: Option<String>,
}
