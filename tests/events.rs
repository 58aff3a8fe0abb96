mod common;

use ella_rises::services::event_service::{self, EventTemplateInput};

use common::{seed_occurrence, seed_template, test_pool};

#[tokio::test]
async fn calendar_feed_carries_the_occurrence_fields() {
    let pool = test_pool().await;
    let template_id = seed_template(&pool, "Monthly Workshop").await;
    let occurrence_id = seed_occurrence(&pool, template_id, "2030-01-10 18:00:00").await;

    let feed = event_service::calendar_feed(&pool, template_id).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, occurrence_id);
    assert_eq!(feed[0].title, "Monthly Workshop");
    assert_eq!(feed[0].start, "2030-01-10 18:00:00");
    assert_eq!(feed[0].location.as_deref(), Some("Community Hall"));
}

#[tokio::test]
async fn calendar_feed_is_scoped_to_the_template() {
    let pool = test_pool().await;
    let first = seed_template(&pool, "Monthly Workshop").await;
    let second = seed_template(&pool, "Book Club").await;
    seed_occurrence(&pool, first, "2030-01-10 18:00:00").await;
    seed_occurrence(&pool, second, "2030-02-10 18:00:00").await;

    let feed = event_service::calendar_feed(&pool, second).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].title, "Book Club");
}

#[tokio::test]
async fn template_ids_are_allocated_sequentially() {
    let pool = test_pool().await;
    let first = seed_template(&pool, "Monthly Workshop").await;
    let second = seed_template(&pool, "Book Club").await;
    assert_eq!(first, 1);
    assert_eq!(second, 2);
}

#[tokio::test]
async fn template_update_rewrites_the_definition() {
    let pool = test_pool().await;
    let template_id = seed_template(&pool, "Monthly Workshop").await;

    event_service::update_template(
        &pool,
        template_id,
        EventTemplateInput {
            name: "Weekly Workshop",
            event_type: Some("Workshop"),
            recurrence_pattern: Some("Weekly"),
            description: Some("Now weekly."),
            default_capacity: Some(12),
        },
    )
    .await
    .unwrap();

    let row = event_service::load_template(&pool, template_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.name, "Weekly Workshop");
    assert_eq!(row.recurrence_pattern.as_deref(), Some("Weekly"));
    assert_eq!(row.default_capacity, Some(12));
}

#[tokio::test]
async fn deleting_a_template_with_occurrences_fails() {
    let pool = test_pool().await;
    let template_id = seed_template(&pool, "Monthly Workshop").await;
    seed_occurrence(&pool, template_id, "2030-01-10 18:00:00").await;

    let result = event_service::delete_template(&pool, template_id).await;
    assert!(result.is_err());

    // The template survives the failed delete.
    assert!(event_service::load_template(&pool, template_id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn deleting_an_unreferenced_template_succeeds() {
    let pool = test_pool().await;
    let template_id = seed_template(&pool, "Monthly Workshop").await;

    event_service::delete_template(&pool, template_id).await.unwrap();
    assert!(event_service::load_template(&pool, template_id)
        .await
        .unwrap()
        .is_none());
}
