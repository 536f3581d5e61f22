use sqlx::SqlitePool;

use crate::models::{
    ChildEventRow, EventOrganizationRow, EventRow, EventVisibilityRow, ParentEventRow,
    RelatedProfileRow,
};

const SQL_LOAD_EVENT_BY_SLUG: &str = r#"
SELECT
  id,
  slug,
  name,
  subline,
  description,
  start_time,
  end_time,
  participation_from,
  participation_until,
  participant_limit,
  venue_name,
  venue_street,
  venue_street_number,
  venue_city,
  venue_zip_code,
  conference_link,
  conference_code,
  background,
  canceled,
  published,
  parent_event_id
FROM events
WHERE slug = ?
LIMIT 1
"#;

pub async fn load_event_by_slug(pool: &SqlitePool, slug: &str) -> sqlx::Result<Option<EventRow>> {
    sqlx::query_as::<_, EventRow>(SQL_LOAD_EVENT_BY_SLUG)
        .bind(slug)
        .fetch_optional(pool)
        .await
}

const SQL_LOAD_EVENT_VISIBILITY: &str = r#"
SELECT subline, description, venue, background
FROM event_visibilities
WHERE event_id = ?
LIMIT 1
"#;

pub async fn load_event_visibility(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Option<EventVisibilityRow>> {
    sqlx::query_as::<_, EventVisibilityRow>(SQL_LOAD_EVENT_VISIBILITY)
        .bind(event_id)
        .fetch_optional(pool)
        .await
}

const SQL_LOAD_PARENT_EVENT: &str = r#"
SELECT
  e.id,
  e.slug,
  e.name,
  e.subline,
  v.subline AS subline_public
FROM events e
LEFT JOIN event_visibilities v ON v.event_id = e.id
WHERE e.id = ?
LIMIT 1
"#;

pub async fn load_parent_event(
    pool: &SqlitePool,
    parent_event_id: &str,
) -> sqlx::Result<Option<ParentEventRow>> {
    sqlx::query_as::<_, ParentEventRow>(SQL_LOAD_PARENT_EVENT)
        .bind(parent_event_id)
        .fetch_optional(pool)
        .await
}

const SQL_LIST_CHILD_EVENTS: &str = r#"
SELECT
  e.id,
  e.slug,
  e.name,
  e.subline,
  e.description,
  e.start_time,
  e.end_time,
  e.participation_from,
  e.participation_until,
  e.participant_limit,
  e.background,
  e.canceled,
  e.published,
  (SELECT COUNT(*) FROM event_participants p WHERE p.event_id = e.id) AS participant_count,
  (SELECT COUNT(*) FROM event_waiting_list w WHERE w.event_id = e.id) AS waiting_list_count,
  v.subline AS subline_public,
  v.description AS description_public,
  v.background AS background_public
FROM events e
LEFT JOIN event_visibilities v ON v.event_id = e.id
WHERE e.parent_event_id = ?
ORDER BY e.start_time ASC, e.name ASC
"#;

pub async fn list_child_events(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Vec<ChildEventRow>> {
    sqlx::query_as::<_, ChildEventRow>(SQL_LIST_CHILD_EVENTS)
        .bind(event_id)
        .fetch_all(pool)
        .await
}

const SQL_COUNT_PARTICIPANTS: &str = r#"
SELECT COUNT(*) FROM event_participants WHERE event_id = ?
"#;

pub async fn count_participants(pool: &SqlitePool, event_id: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar(SQL_COUNT_PARTICIPANTS)
        .bind(event_id)
        .fetch_one(pool)
        .await
}

const SQL_COUNT_WAITING_LIST: &str = r#"
SELECT COUNT(*) FROM event_waiting_list WHERE event_id = ?
"#;

pub async fn count_waiting_list(pool: &SqlitePool, event_id: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar(SQL_COUNT_WAITING_LIST)
        .bind(event_id)
        .fetch_one(pool)
        .await
}

const SQL_LIST_PARTICIPANTS: &str = r#"
SELECT
  p.id,
  p.username,
  p.first_name,
  p.last_name,
  p.academic_title,
  p.position,
  p.avatar,
  v.academic_title AS academic_title_public,
  v.position AS position_public
FROM event_participants r
JOIN profiles p ON p.id = r.profile_id
LEFT JOIN profile_visibilities v ON v.profile_id = p.id
WHERE r.event_id = ?
ORDER BY datetime(r.created_at) ASC
"#;

const SQL_LIST_SPEAKERS: &str = r#"
SELECT
  p.id,
  p.username,
  p.first_name,
  p.last_name,
  p.academic_title,
  p.position,
  p.avatar,
  v.academic_title AS academic_title_public,
  v.position AS position_public
FROM event_speakers r
JOIN profiles p ON p.id = r.profile_id
LEFT JOIN profile_visibilities v ON v.profile_id = p.id
WHERE r.event_id = ?
ORDER BY p.first_name ASC, p.last_name ASC
"#;

const SQL_LIST_TEAM_MEMBERS: &str = r#"
SELECT
  p.id,
  p.username,
  p.first_name,
  p.last_name,
  p.academic_title,
  p.position,
  p.avatar,
  v.academic_title AS academic_title_public,
  v.position AS position_public
FROM event_team_members r
JOIN profiles p ON p.id = r.profile_id
LEFT JOIN profile_visibilities v ON v.profile_id = p.id
WHERE r.event_id = ?
ORDER BY p.first_name ASC, p.last_name ASC
"#;

pub async fn list_participants(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Vec<RelatedProfileRow>> {
    sqlx::query_as::<_, RelatedProfileRow>(SQL_LIST_PARTICIPANTS)
        .bind(event_id)
        .fetch_all(pool)
        .await
}

pub async fn list_speakers(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Vec<RelatedProfileRow>> {
    sqlx::query_as::<_, RelatedProfileRow>(SQL_LIST_SPEAKERS)
        .bind(event_id)
        .fetch_all(pool)
        .await
}

pub async fn list_team_members(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Vec<RelatedProfileRow>> {
    sqlx::query_as::<_, RelatedProfileRow>(SQL_LIST_TEAM_MEMBERS)
        .bind(event_id)
        .fetch_all(pool)
        .await
}

// Full-depth aggregation: the event plus its whole descendant tree,
// deduplicated by profile id via DISTINCT.
const SQL_LIST_FULL_DEPTH_PARTICIPANTS: &str = r#"
WITH RECURSIVE descendants(id) AS (
  SELECT id FROM events WHERE id = ?
  UNION ALL
  SELECT e.id FROM events e JOIN descendants d ON e.parent_event_id = d.id
)
SELECT DISTINCT
  p.id,
  p.username,
  p.first_name,
  p.last_name,
  p.academic_title,
  p.position,
  p.avatar,
  v.academic_title AS academic_title_public,
  v.position AS position_public
FROM event_participants r
JOIN descendants d ON d.id = r.event_id
JOIN profiles p ON p.id = r.profile_id
LEFT JOIN profile_visibilities v ON v.profile_id = p.id
ORDER BY p.first_name ASC, p.last_name ASC
"#;

const SQL_LIST_FULL_DEPTH_SPEAKERS: &str = r#"
WITH RECURSIVE descendants(id) AS (
  SELECT id FROM events WHERE id = ?
  UNION ALL
  SELECT e.id FROM events e JOIN descendants d ON e.parent_event_id = d.id
)
SELECT DISTINCT
  p.id,
  p.username,
  p.first_name,
  p.last_name,
  p.academic_title,
  p.position,
  p.avatar,
  v.academic_title AS academic_title_public,
  v.position AS position_public
FROM event_speakers r
JOIN descendants d ON d.id = r.event_id
JOIN profiles p ON p.id = r.profile_id
LEFT JOIN profile_visibilities v ON v.profile_id = p.id
ORDER BY p.first_name ASC, p.last_name ASC
"#;

pub async fn list_full_depth_participants(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Vec<RelatedProfileRow>> {
    sqlx::query_as::<_, RelatedProfileRow>(SQL_LIST_FULL_DEPTH_PARTICIPANTS)
        .bind(event_id)
        .fetch_all(pool)
        .await
}

pub async fn list_full_depth_speakers(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Vec<RelatedProfileRow>> {
    sqlx::query_as::<_, RelatedProfileRow>(SQL_LIST_FULL_DEPTH_SPEAKERS)
        .bind(event_id)
        .fetch_all(pool)
        .await
}

const SQL_LIST_RESPONSIBLE_ORGANIZATIONS: &str = r#"
SELECT
  o.id,
  o.slug,
  o.name,
  o.logo
FROM event_responsible_organizations r
JOIN organizations o ON o.id = r.organization_id
WHERE r.event_id = ?
ORDER BY o.name ASC
"#;

pub async fn list_responsible_organizations(
    pool: &SqlitePool,
    event_id: &str,
) -> sqlx::Result<Vec<EventOrganizationRow>> {
    sqlx::query_as::<_, EventOrganizationRow>(SQL_LIST_RESPONSIBLE_ORGANIZATIONS)
        .bind(event_id)
        .fetch_all(pool)
        .await
}
