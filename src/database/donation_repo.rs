use sqlx::{Executor, Sqlite};

use crate::models::{DonationRow, DonationWithDonorRow};

const SQL_NEXT_DONATION_ID: &str = r#"
SELECT COALESCE(MAX(donation_id), 0) + 1 FROM donations
"#;

const SQL_NEXT_DONATION_NO: &str = r#"
SELECT COALESCE(MAX(donation_no), 0) + 1
FROM donations
WHERE participant_id = ?1
"#;

const SQL_INSERT: &str = r#"
INSERT INTO donations (
  donation_id,
  participant_id,
  amount,
  donated_on,
  donation_no
) VALUES (?, ?, ?, ?, ?)
"#;

const SQL_INSERT_NOW: &str = r#"
INSERT INTO donations (
  donation_id,
  participant_id,
  amount,
  donated_on,
  donation_no
) VALUES (?1, ?2, ?3, datetime('now'), ?4)
"#;

const SQL_LIST_FOR_PARTICIPANT: &str = r#"
SELECT
    donation_id,
    participant_id,
    amount,
    donated_on,
    donation_no
FROM donations
WHERE participant_id = ?1
ORDER BY donated_on DESC
"#;

const SQL_LIST_WITH_DONORS: &str = r#"
SELECT
    d.donation_id,
    d.participant_id,
    d.amount,
    d.donated_on,
    d.donation_no,
    p.email,
    p.first_name,
    p.last_name
FROM donations d
JOIN participants p ON p.participant_id = d.participant_id
WHERE ?1 = ''
   OR p.first_name LIKE '%' || ?1 || '%'
   OR p.last_name LIKE '%' || ?1 || '%'
   OR p.first_name || ' ' || p.last_name LIKE '%' || ?1 || '%'
ORDER BY d.donated_on DESC
"#;

const SQL_LOAD_WITH_DONOR: &str = r#"
SELECT
    d.donation_id,
    d.participant_id,
    d.amount,
    d.donated_on,
    d.donation_no,
    p.email,
    p.first_name,
    p.last_name
FROM donations d
JOIN participants p ON p.participant_id = d.participant_id
WHERE d.donation_id = ?1
LIMIT 1
"#;

const SQL_UPDATE: &str = r#"
UPDATE donations
SET amount = ?2,
    donated_on = ?3
WHERE donation_id = ?1
"#;

const SQL_DELETE: &str = r#"
DELETE FROM donations WHERE donation_id = ?1
"#;

const SQL_GRAND_TOTAL: &str = r#"
SELECT COALESCE(SUM(amount), 0.0) FROM donations
"#;

const SQL_TOTAL_FOR_PARTICIPANT: &str = r#"
SELECT COALESCE(SUM(amount), 0.0) FROM donations WHERE participant_id = ?1
"#;

/// Highest current identifier + 1; 1 on an empty table. Call inside the
/// inserting transaction.
pub async fn next_donation_id<'e, E>(ex: E) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(SQL_NEXT_DONATION_ID).fetch_one(ex).await
}

/// Next per-participant donation number: highest assigned + 1, strictly
/// increasing even after deletions. Call inside the inserting transaction.
pub async fn next_donation_no<'e, E>(ex: E, participant_id: i64) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(SQL_NEXT_DONATION_NO)
        .bind(participant_id)
        .fetch_one(ex)
        .await
}

pub struct NewDonation<'a> {
    pub donation_id: i64,
    pub participant_id: i64,
    pub amount: f64,
    pub donated_on: &'a str,
    pub donation_no: i64,
}

pub async fn insert<'e, E>(ex: E, row: NewDonation<'_>) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_INSERT)
        .bind(row.donation_id)
        .bind(row.participant_id)
        .bind(row.amount)
        .bind(row.donated_on)
        .bind(row.donation_no)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

/// Insert stamped with the storage clock, for the public donation path.
pub async fn insert_now<'e, E>(
    ex: E,
    donation_id: i64,
    participant_id: i64,
    amount: f64,
    donation_no: i64,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_INSERT_NOW)
        .bind(donation_id)
        .bind(participant_id)
        .bind(amount)
        .bind(donation_no)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn list_for_participant<'e, E>(
    ex: E,
    participant_id: i64,
) -> sqlx::Result<Vec<DonationRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, DonationRow>(SQL_LIST_FOR_PARTICIPANT)
        .bind(participant_id)
        .fetch_all(ex)
        .await
}

pub async fn list_with_donors<'e, E>(
    ex: E,
    search: &str,
) -> sqlx::Result<Vec<DonationWithDonorRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, DonationWithDonorRow>(SQL_LIST_WITH_DONORS)
        .bind(search)
        .fetch_all(ex)
        .await
}

pub async fn load_with_donor<'e, E>(
    ex: E,
    donation_id: i64,
) -> sqlx::Result<Option<DonationWithDonorRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, DonationWithDonorRow>(SQL_LOAD_WITH_DONOR)
        .bind(donation_id)
        .fetch_optional(ex)
        .await
}

pub async fn update<'e, E>(
    ex: E,
    donation_id: i64,
    amount: f64,
    donated_on: &str,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_UPDATE)
        .bind(donation_id)
        .bind(amount)
        .bind(donated_on)
        .execute(ex)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete<'e, E>(ex: E, donation_id: i64) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_DELETE).bind(donation_id).execute(ex).await?;
    Ok(res.rows_affected())
}

/// Recomputed on every read, never maintained incrementally.
pub async fn grand_total<'e, E>(ex: E) -> sqlx::Result<f64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(SQL_GRAND_TOTAL).fetch_one(ex).await
}

pub async fn total_for_participant<'e, E>(ex: E, participant_id: i64) -> sqlx::Result<f64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(SQL_TOTAL_FOR_PARTICIPANT)
        .bind(participant_id)
        .fetch_one(ex)
        .await
}
