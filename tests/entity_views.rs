//! Profile/organization/project view tests against an in-memory SQLite
//! database, covering visibility filtering and image URL derivation.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use community_platform::config::Config;
use community_platform::images::ImageUrlBuilder;
use community_platform::services::{
    event_service, organization_service, profile_service, project_service,
};

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
        community_base_url: Some("https://community.test".to_string()),
        imgproxy_url: "http://images.test".to_string(),
        imgproxy_key: None,
        imgproxy_salt: None,
    })
}

async fn insert_anna(pool: &SqlitePool) {
    sqlx::query(
        "INSERT INTO profiles (id, username, first_name, last_name, academic_title, email,
             phone, bio, position, website, avatar, background)
         VALUES ('anna', 'anna', 'Anna', 'Schmidt', 'Dr.', 'anna@example.org',
             '+49 30 1234', 'About Anna', 'Lead', 'https://anna.example',
             'avatars/anna.jpg', 'backgrounds/anna.jpg')",
    )
    .execute(pool)
    .await
    .expect("insert profile");
}

#[tokio::test]
async fn profile_without_settings_row_is_fully_private_for_anonymous() {
    let pool = setup_pool().await;
    insert_anna(&pool).await;

    let view = profile_service::load_profile_view(&pool, &images(), "anna", true)
        .await
        .expect("load")
        .expect("profile exists");

    assert_eq!(view.email, None);
    assert_eq!(view.phone, None);
    assert_eq!(view.bio, None);
    assert_eq!(view.academic_title, None);
    assert!(view.areas.is_empty());
    // Identity and images survive, as derived URLs.
    assert_eq!(view.first_name, "Anna");
    let avatar = view.avatar.expect("avatar url");
    assert!(avatar.starts_with("http://images.test/insecure/rs:fill:64:64:0/g:ce/"));
    let background = view.background.expect("background url");
    assert!(background.contains("/rs:fill:1488:480:1/"));
}

#[tokio::test]
async fn profile_settings_expose_selected_fields_to_anonymous() {
    let pool = setup_pool().await;
    insert_anna(&pool).await;
    sqlx::query(
        "INSERT INTO profile_visibilities (profile_id, email, bio) VALUES ('anna', 1, 1)",
    )
    .execute(&pool)
    .await
    .expect("visibility row");

    let view = profile_service::load_profile_view(&pool, &images(), "anna", true)
        .await
        .expect("load")
        .expect("profile exists");
    assert_eq!(view.email.as_deref(), Some("anna@example.org"));
    assert_eq!(view.bio.as_deref(), Some("About Anna"));
    assert_eq!(view.phone, None);

    // The session view is unfiltered.
    let own = profile_service::load_profile_view(&pool, &images(), "anna", false)
        .await
        .expect("load")
        .expect("profile exists");
    assert_eq!(own.phone.as_deref(), Some("+49 30 1234"));
}

#[tokio::test]
async fn organization_members_are_filtered_per_their_own_settings() {
    let pool = setup_pool().await;
    insert_anna(&pool).await;
    sqlx::query(
        "INSERT INTO profile_visibilities (profile_id, academic_title, position)
         VALUES ('anna', 1, 0)",
    )
    .execute(&pool)
    .await
    .expect("visibility row");
    sqlx::query(
        "INSERT INTO organizations (id, slug, name, bio, email) VALUES
         ('org', 'mint-org', 'MINT Org', 'About us', 'hello@org.example')",
    )
    .execute(&pool)
    .await
    .expect("insert organization");
    sqlx::query("INSERT INTO organization_members (organization_id, profile_id) VALUES ('org', 'anna')")
        .execute(&pool)
        .await
        .expect("insert member");

    let view = organization_service::load_organization_view(&pool, &images(), "mint-org", true)
        .await
        .expect("load")
        .expect("organization exists");
    // No organization settings row: contact fields private.
    assert_eq!(view.bio, None);
    assert_eq!(view.email, None);
    assert_eq!(view.members.len(), 1);
    let member = &view.members[0];
    assert_eq!(member.academic_title.as_deref(), Some("Dr."));
    assert_eq!(member.position, None);
}

#[tokio::test]
async fn project_view_filters_and_builds_canonical_url() {
    let pool = setup_pool().await;
    sqlx::query(
        "INSERT INTO projects (id, slug, name, excerpt, description, email) VALUES
         ('proj', 'robotics', 'Robotics Lab', 'Short', 'Long', 'team@proj.example')",
    )
    .execute(&pool)
    .await
    .expect("insert project");
    sqlx::query("INSERT INTO project_visibilities (project_id, excerpt) VALUES ('proj', 1)")
        .execute(&pool)
        .await
        .expect("visibility row");

    let view = project_service::load_project_view(&pool, &images(), "robotics", true)
        .await
        .expect("load")
        .expect("project exists");
    assert_eq!(view.excerpt.as_deref(), Some("Short"));
    assert_eq!(view.description, None);
    assert_eq!(view.email, None);

    assert_eq!(
        project_service::canonical_url(Some("https://community.test"), &view.slug).as_deref(),
        Some("https://community.test/project/robotics")
    );
    assert_eq!(project_service::canonical_url(None, &view.slug), None);
}

#[tokio::test]
async fn suggestions_match_name_or_email_and_skip_attached_profiles() {
    let pool = setup_pool().await;
    insert_anna(&pool).await;
    sqlx::query(
        "INSERT INTO profiles (id, username, first_name, last_name, email) VALUES
         ('bob', 'bob', 'Bob', 'Annaberg', 'bob@example.org'),
         ('carl', 'carl', 'Carl', 'Meyer', 'carl.anna@example.org'),
         ('dora', 'dora', 'Dora', 'Klein', 'dora@example.org')",
    )
    .execute(&pool)
    .await
    .expect("insert profiles");
    sqlx::query(
        "INSERT INTO events (id, slug, name, start_time, end_time, participation_from,
             participation_until, published)
         VALUES ('ev', 'ev', 'Event', '2026-09-01T10:00:00Z', '2026-09-01T12:00:00Z',
             '2026-08-01T00:00:00Z', '2026-09-01T00:00:00Z', 1)",
    )
    .execute(&pool)
    .await
    .expect("insert event");
    // Anna already participates, Bob already waits: both excluded.
    sqlx::query("INSERT INTO event_participants (event_id, profile_id) VALUES ('ev', 'anna')")
        .execute(&pool)
        .await
        .expect("insert participant");
    sqlx::query("INSERT INTO event_waiting_list (event_id, profile_id) VALUES ('ev', 'bob')")
        .execute(&pool)
        .await
        .expect("insert waiting");

    let suggestions = event_service::participant_suggestions(&pool, &images(), "ev", "anna")
        .await
        .expect("suggestions");
    let usernames: Vec<&str> = suggestions.iter().map(|s| s.username.as_str()).collect();
    // Carl matches on email only; Dora does not match at all.
    assert_eq!(usernames, vec!["carl"]);

    // Every word of the query has to match.
    let suggestions = event_service::participant_suggestions(&pool, &images(), "ev", "dora kl")
        .await
        .expect("suggestions");
    let usernames: Vec<&str> = suggestions.iter().map(|s| s.username.as_str()).collect();
    assert_eq!(usernames, vec!["dora"]);

    let none = event_service::participant_suggestions(&pool, &images(), "ev", "dora meyer")
        .await
        .expect("suggestions");
    assert!(none.is_empty());
}
