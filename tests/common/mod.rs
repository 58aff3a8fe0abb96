#![allow(dead_code)]

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use ella_rises::models::Role;
use ella_rises::services::event_service::{self, EventOccurrenceInput, EventTemplateInput};
use ella_rises::services::identity_service::{self, NewParticipantInput};

/// Fresh in-memory database with the full schema applied. A single
/// connection, because every pooled connection to `sqlite::memory:` would
/// otherwise get its own empty database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("cannot open in-memory database");
    sqlx::raw_sql(include_str!("../../db/schema.sql"))
        .execute(&pool)
        .await
        .expect("cannot apply schema");
    pool
}

pub async fn seed_participant(pool: &SqlitePool, email: &str, role: Role) -> i64 {
    identity_service::create_participant(
        pool,
        NewParticipantInput {
            email,
            password: Some("secret"),
            first_name: Some("Test"),
            last_name: Some("Person"),
            phone: None,
            city: None,
            state: None,
            zip: None,
            role,
        },
    )
    .await
    .expect("seed participant")
}

pub async fn seed_template(pool: &SqlitePool, name: &str) -> i64 {
    event_service::create_template(
        pool,
        EventTemplateInput {
            name,
            event_type: Some("Workshop"),
            recurrence_pattern: Some("Monthly"),
            description: None,
            default_capacity: Some(20),
        },
    )
    .await
    .expect("seed template")
}

pub async fn seed_occurrence(pool: &SqlitePool, template_id: i64, starts_at: &str) -> i64 {
    event_service::add_occurrence(
        pool,
        EventOccurrenceInput {
            event_template_id: template_id,
            starts_at,
            ends_at: None,
            location: Some("Community Hall"),
            capacity: Some(20),
            registration_deadline: None,
        },
    )
    .await
    .expect("seed occurrence")
}
