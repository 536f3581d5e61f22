//! End-to-end service tests against an in-memory SQLite database.

use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use community_platform::config::Config;
use community_platform::error::AppError;
use community_platform::images::ImageUrlBuilder;
use community_platform::services::event_service;
use community_platform::services::participation::{ParticipationAction, CONFERENCE_LINK_PENDING};

async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    sqlx::raw_sql(include_str!("../db/schema.sql"))
        .execute(&pool)
        .await
        .expect("schema");
    pool
}

fn images() -> ImageUrlBuilder {
    ImageUrlBuilder::from_config(&Config {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        api_key: None,
        community_base_url: None,
        imgproxy_url: "http://images.test".to_string(),
        imgproxy_key: None,
        imgproxy_salt: None,
    })
}

async fn insert_profile(pool: &SqlitePool, id: &str) {
    sqlx::query(
        "INSERT INTO profiles (id, username, first_name, last_name, email)
         VALUES (?1, ?1, ?1, 'Tester', ?1 || '@example.org')",
    )
    .bind(id)
    .execute(pool)
    .await
    .expect("insert profile");
}

async fn insert_event(
    pool: &SqlitePool,
    id: &str,
    parent: Option<&str>,
    published: bool,
    limit: Option<i64>,
) {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO events (id, slug, name, subline, description, start_time, end_time,
             participation_from, participation_until, participant_limit,
             venue_name, conference_link, conference_code, published, parent_event_id)
         VALUES (?1, ?1, ?1, 'Subline', 'Description', ?2, ?3, ?4, ?5, ?6,
             'Venue hall', 'https://meet.example.com/x', '1234', ?7, ?8)",
    )
    .bind(id)
    .bind(now + Duration::days(1))
    .bind(now + Duration::days(2))
    .bind(now - Duration::hours(1))
    .bind(now + Duration::hours(1))
    .bind(limit)
    .bind(published)
    .bind(parent)
    .execute(pool)
    .await
    .expect("insert event");
}

async fn add_participant(pool: &SqlitePool, event_id: &str, profile_id: &str) {
    sqlx::query("INSERT INTO event_participants (event_id, profile_id) VALUES (?1, ?2)")
        .bind(event_id)
        .bind(profile_id)
        .execute(pool)
        .await
        .expect("insert participant");
}

async fn add_team_member(pool: &SqlitePool, event_id: &str, profile_id: &str, privileged: bool) {
    sqlx::query(
        "INSERT INTO event_team_members (event_id, profile_id, is_privileged) VALUES (?1, ?2, ?3)",
    )
    .bind(event_id)
    .bind(profile_id)
    .bind(privileged)
    .execute(pool)
    .await
    .expect("insert team member");
}

fn assert_validation(result: Result<(), AppError>) {
    match result {
        Err(AppError::Validation { .. }) => {}
        other => panic!("expected a validation error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn event_with_children_lists_deduplicated_descendant_participants() {
    let pool = setup_pool().await;
    for p in ["anna", "bob", "viewer"] {
        insert_profile(&pool, p).await;
    }
    insert_event(&pool, "conf", None, true, None).await;
    insert_event(&pool, "day-1", Some("conf"), true, None).await;
    insert_event(&pool, "day-2", Some("conf"), true, None).await;
    add_participant(&pool, "day-1", "anna").await;
    add_participant(&pool, "day-2", "anna").await;
    add_participant(&pool, "day-1", "bob").await;

    let view = event_service::load_event_detail(&pool, &images(), "conf", Some("viewer"), Utc::now())
        .await
        .expect("load")
        .expect("event exists");

    let mut usernames: Vec<&str> = view
        .event
        .participants
        .iter()
        .map(|p| p.username.as_str())
        .collect();
    usernames.sort();
    assert_eq!(usernames, vec!["anna", "bob"]);
    assert_eq!(view.event.child_events.len(), 2);
    // The displayed count follows the deduplicated full-depth listing.
    assert_eq!(view.event.participant_count, 2);
}

#[tokio::test]
async fn leaf_event_lists_only_direct_participants() {
    let pool = setup_pool().await;
    for p in ["anna", "viewer"] {
        insert_profile(&pool, p).await;
    }
    insert_event(&pool, "workshop", None, true, None).await;
    add_participant(&pool, "workshop", "anna").await;

    let view =
        event_service::load_event_detail(&pool, &images(), "workshop", Some("viewer"), Utc::now())
            .await
            .expect("load")
            .expect("event exists");
    assert_eq!(view.event.participants.len(), 1);
    assert_eq!(view.event.participant_count, 1);
}

#[tokio::test]
async fn unpublished_children_are_hidden_except_from_their_team() {
    let pool = setup_pool().await;
    for p in ["team", "viewer"] {
        insert_profile(&pool, p).await;
    }
    insert_event(&pool, "conf", None, true, None).await;
    insert_event(&pool, "draft-day", Some("conf"), false, None).await;
    add_team_member(&pool, "draft-day", "team", false).await;

    let anon = event_service::load_event_detail(&pool, &images(), "conf", None, Utc::now())
        .await
        .expect("load")
        .expect("event exists");
    assert!(anon.event.child_events.is_empty());

    let stranger =
        event_service::load_event_detail(&pool, &images(), "conf", Some("viewer"), Utc::now())
            .await
            .expect("load")
            .expect("event exists");
    assert!(stranger.event.child_events.is_empty());

    let team = event_service::load_event_detail(&pool, &images(), "conf", Some("team"), Utc::now())
        .await
        .expect("load")
        .expect("event exists");
    assert_eq!(team.event.child_events.len(), 1);
    assert_eq!(team.event.child_events[0].slug, "draft-day");
}

#[tokio::test]
async fn unpublished_event_is_forbidden_for_outsiders() {
    let pool = setup_pool().await;
    for p in ["team", "viewer"] {
        insert_profile(&pool, p).await;
    }
    insert_event(&pool, "draft", None, false, None).await;
    add_team_member(&pool, "draft", "team", false).await;

    let denied =
        event_service::load_event_detail(&pool, &images(), "draft", Some("viewer"), Utc::now())
            .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let allowed =
        event_service::load_event_detail(&pool, &images(), "draft", Some("team"), Utc::now())
            .await
            .expect("load");
    assert!(allowed.is_some());
}

#[tokio::test]
async fn anonymous_view_is_visibility_filtered_and_link_gated() {
    let pool = setup_pool().await;
    insert_profile(&pool, "anna").await;
    insert_event(&pool, "meetup", None, true, None).await;
    sqlx::query(
        "INSERT INTO event_visibilities (event_id, subline, description, venue, background)
         VALUES ('meetup', 1, 0, 0, 0)",
    )
    .execute(&pool)
    .await
    .expect("visibility row");
    add_participant(&pool, "meetup", "anna").await;

    let anon = event_service::load_event_detail(&pool, &images(), "meetup", None, Utc::now())
        .await
        .expect("load")
        .expect("event exists");
    assert_eq!(anon.event.subline.as_deref(), Some("Subline"));
    assert_eq!(anon.event.description, None);
    assert_eq!(anon.event.venue_name, None);
    assert_eq!(anon.event.conference_link, None);
    assert_eq!(anon.event.conference_code, None);

    let participant =
        event_service::load_event_detail(&pool, &images(), "meetup", Some("anna"), Utc::now())
            .await
            .expect("load")
            .expect("event exists");
    assert_eq!(participant.event.description.as_deref(), Some("Description"));
    assert_eq!(
        participant.event.conference_link.as_deref(),
        Some("https://meet.example.com/x")
    );
    assert_eq!(participant.event.conference_code.as_deref(), Some("1234"));
    assert_eq!(participant.action, ParticipationAction::AlreadyJoined);
}

#[tokio::test]
async fn eligible_viewer_gets_pending_placeholder_when_no_link_is_set() {
    let pool = setup_pool().await;
    insert_profile(&pool, "anna").await;
    insert_event(&pool, "meetup", None, true, None).await;
    sqlx::query("UPDATE events SET conference_link = NULL, conference_code = NULL")
        .execute(&pool)
        .await
        .expect("clear link");
    add_participant(&pool, "meetup", "anna").await;

    let view = event_service::load_event_detail(&pool, &images(), "meetup", Some("anna"), Utc::now())
        .await
        .expect("load")
        .expect("event exists");
    assert_eq!(
        view.event.conference_link.as_deref(),
        Some(CONFERENCE_LINK_PENDING)
    );
    assert_eq!(view.event.conference_code, None);
}

#[tokio::test]
async fn join_then_rejoin_is_a_validation_error() {
    let pool = setup_pool().await;
    insert_profile(&pool, "anna").await;
    insert_event(&pool, "meetup", None, true, Some(10)).await;

    event_service::join_event(&pool, "meetup", "anna", Utc::now())
        .await
        .expect("first join");
    assert_validation(event_service::join_event(&pool, "meetup", "anna", Utc::now()).await);
}

#[tokio::test]
async fn full_event_rejects_joins_and_accepts_waitlisting() {
    let pool = setup_pool().await;
    for p in ["anna", "bob"] {
        insert_profile(&pool, p).await;
    }
    insert_event(&pool, "meetup", None, true, Some(1)).await;
    add_participant(&pool, "meetup", "anna").await;

    assert_validation(event_service::join_event(&pool, "meetup", "bob", Utc::now()).await);
    event_service::join_waiting_list(&pool, "meetup", "bob", Utc::now())
        .await
        .expect("waitlist join");
    assert_validation(event_service::join_waiting_list(&pool, "meetup", "bob", Utc::now()).await);
}

#[tokio::test]
async fn waitlisting_with_free_seats_is_rejected() {
    let pool = setup_pool().await;
    insert_profile(&pool, "anna").await;
    insert_event(&pool, "meetup", None, true, Some(5)).await;

    assert_validation(event_service::join_waiting_list(&pool, "meetup", "anna", Utc::now()).await);
}

#[tokio::test]
async fn moving_from_the_waiting_list_ignores_the_limit() {
    let pool = setup_pool().await;
    for p in ["anna", "bob"] {
        insert_profile(&pool, p).await;
    }
    insert_event(&pool, "meetup", None, true, Some(1)).await;
    add_participant(&pool, "meetup", "anna").await;
    event_service::join_waiting_list(&pool, "meetup", "bob", Utc::now())
        .await
        .expect("waitlist join");

    event_service::move_from_waiting_list(&pool, "meetup", "bob")
        .await
        .expect("promote");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_participants")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(count, 2);
    let waiting: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_waiting_list")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(waiting, 0);
}

#[tokio::test]
async fn leaving_without_a_membership_is_not_found() {
    let pool = setup_pool().await;
    insert_profile(&pool, "anna").await;
    insert_event(&pool, "meetup", None, true, None).await;

    let left = event_service::leave_event(&pool, "meetup", "anna").await;
    assert!(matches!(left, Err(AppError::NotFound(_))));
    let left = event_service::leave_waiting_list(&pool, "meetup", "anna").await;
    assert!(matches!(left, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn limit_below_current_participants_is_rejected() {
    let pool = setup_pool().await;
    for p in ["anna", "bob"] {
        insert_profile(&pool, p).await;
    }
    insert_event(&pool, "meetup", None, true, None).await;
    add_participant(&pool, "meetup", "anna").await;
    add_participant(&pool, "meetup", "bob").await;

    let updated = event_service::update_participant_limit(&pool, "meetup", Some(1)).await;
    match updated {
        Err(AppError::Validation { field, .. }) => {
            assert_eq!(field.as_deref(), Some("participant_limit"));
        }
        other => panic!("expected a field validation error, got {:?}", other.err()),
    }

    // Raising it (or clearing it) is fine.
    event_service::update_participant_limit(&pool, "meetup", Some(5))
        .await
        .expect("raise limit");
    event_service::update_participant_limit(&pool, "meetup", None)
        .await
        .expect("clear limit");
    let limit: Option<i64> = sqlx::query_scalar("SELECT participant_limit FROM events")
        .fetch_one(&pool)
        .await
        .expect("limit");
    assert_eq!(limit, None);
}
