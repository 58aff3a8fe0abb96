use sqlx::SqlitePool;

use crate::database::{milestone_repo, participant_milestone_repo};
use crate::models::{MilestoneAchieverRow, MilestoneRow};
use crate::services::error::{ServiceError, ServiceResult};

/// Records an achievement. The sequence number is the participant's current
/// achievement count + 1, computed inside the inserting transaction so
/// numbers are strictly increasing per participant. Deletions never free a
/// number for reuse. Recording the same milestone twice is allowed.
pub async fn add_achievement(
    pool: &SqlitePool,
    participant_id: i64,
    milestone_id: i64,
    achieved_on: Option<&str>,
) -> ServiceResult<i64> {
    let mut tx = pool.begin().await?;

    if milestone_repo::load_by_id(&mut *tx, milestone_id).await?.is_none() {
        return Err(ServiceError::NotFound("milestone not found"));
    }

    let milestone_no =
        participant_milestone_repo::next_milestone_no(&mut *tx, participant_id).await?;
    let participant_milestone_id =
        participant_milestone_repo::next_participant_milestone_id(&mut *tx).await?;

    participant_milestone_repo::insert(
        &mut *tx,
        participant_milestone_repo::NewAchievement {
            participant_milestone_id,
            participant_id,
            milestone_id,
            achieved_on,
            milestone_no,
        },
    )
    .await?;

    tx.commit().await?;
    Ok(participant_milestone_id)
}

pub async fn edit_achievement(
    pool: &SqlitePool,
    participant_milestone_id: i64,
    milestone_id: i64,
    achieved_on: Option<&str>,
) -> ServiceResult<()> {
    let updated = participant_milestone_repo::update(
        pool,
        participant_milestone_id,
        milestone_id,
        achieved_on,
    )
    .await?;
    if updated == 0 {
        return Err(ServiceError::NotFound("achievement record not found"));
    }
    Ok(())
}

pub async fn delete_achievement(
    pool: &SqlitePool,
    participant_milestone_id: i64,
) -> ServiceResult<()> {
    let deleted = participant_milestone_repo::delete(pool, participant_milestone_id).await?;
    if deleted == 0 {
        return Err(ServiceError::NotFound("achievement record not found"));
    }
    Ok(())
}

pub async fn create_milestone(pool: &SqlitePool, title: &str) -> ServiceResult<i64> {
    if title.trim().is_empty() {
        return Err(ServiceError::Validation("milestone title is required"));
    }

    let mut tx = pool.begin().await?;
    let milestone_id = milestone_repo::next_milestone_id(&mut *tx).await?;
    milestone_repo::insert(&mut *tx, milestone_id, title).await?;
    tx.commit().await?;
    Ok(milestone_id)
}

pub async fn rename_milestone(
    pool: &SqlitePool,
    milestone_id: i64,
    title: &str,
) -> ServiceResult<()> {
    if title.trim().is_empty() {
        return Err(ServiceError::Validation("milestone title is required"));
    }
    let updated = milestone_repo::update(pool, milestone_id, title).await?;
    if updated == 0 {
        return Err(ServiceError::NotFound("milestone not found"));
    }
    Ok(())
}

pub async fn delete_milestone(pool: &SqlitePool, milestone_id: i64) -> ServiceResult<()> {
    let deleted = milestone_repo::delete(pool, milestone_id).await?;
    if deleted == 0 {
        return Err(ServiceError::NotFound("milestone not found"));
    }
    Ok(())
}

pub async fn list_milestones(pool: &SqlitePool, search: &str) -> ServiceResult<Vec<MilestoneRow>> {
    Ok(milestone_repo::list(pool, search).await?)
}

pub async fn load_milestone(
    pool: &SqlitePool,
    milestone_id: i64,
) -> ServiceResult<Option<MilestoneRow>> {
    Ok(milestone_repo::load_by_id(pool, milestone_id).await?)
}

pub async fn list_achievers(
    pool: &SqlitePool,
    milestone_id: i64,
) -> ServiceResult<Vec<MilestoneAchieverRow>> {
    Ok(milestone_repo::list_achievers(pool, milestone_id).await?)
}

pub async fn total_achievements(pool: &SqlitePool) -> ServiceResult<i64> {
    Ok(participant_milestone_repo::count_all(pool).await?)
}
