//! Write primitives for participation mutations. All of them take a
//! connection so the service layer can group re-validation and write in
//! one transaction; the unique keys on the join tables stay the
//! authoritative duplicate/capacity enforcement.

use sqlx::SqliteConnection;

use crate::models::EventRow;

const SQL_LOAD_EVENT_FOR_UPDATE: &str = r#"
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

pub async fn load_event_for_update(
    conn: &mut SqliteConnection,
    slug: &str,
) -> sqlx::Result<Option<EventRow>> {
    sqlx::query_as::<_, EventRow>(SQL_LOAD_EVENT_FOR_UPDATE)
        .bind(slug)
        .fetch_optional(conn)
        .await
}

const SQL_COUNT_PARTICIPANTS: &str = r#"
SELECT COUNT(*) FROM event_participants WHERE event_id = ?
"#;

pub async fn count_participants(
    conn: &mut SqliteConnection,
    event_id: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar(SQL_COUNT_PARTICIPANTS)
        .bind(event_id)
        .fetch_one(conn)
        .await
}

const SQL_INSERT_PARTICIPANT: &str = r#"
INSERT INTO event_participants (event_id, profile_id) VALUES (?, ?)
"#;

pub async fn insert_participant(
    conn: &mut SqliteConnection,
    event_id: &str,
    profile_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_PARTICIPANT)
        .bind(event_id)
        .bind(profile_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DELETE_PARTICIPANT: &str = r#"
DELETE FROM event_participants WHERE event_id = ? AND profile_id = ?
"#;

pub async fn delete_participant(
    conn: &mut SqliteConnection,
    event_id: &str,
    profile_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_PARTICIPANT)
        .bind(event_id)
        .bind(profile_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

const SQL_INSERT_WAITING_LIST_ENTRY: &str = r#"
INSERT INTO event_waiting_list (event_id, profile_id) VALUES (?, ?)
"#;

pub async fn insert_waiting_list_entry(
    conn: &mut SqliteConnection,
    event_id: &str,
    profile_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_WAITING_LIST_ENTRY)
        .bind(event_id)
        .bind(profile_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DELETE_WAITING_LIST_ENTRY: &str = r#"
DELETE FROM event_waiting_list WHERE event_id = ? AND profile_id = ?
"#;

pub async fn delete_waiting_list_entry(
    conn: &mut SqliteConnection,
    event_id: &str,
    profile_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_WAITING_LIST_ENTRY)
        .bind(event_id)
        .bind(profile_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

const SQL_UPDATE_PARTICIPANT_LIMIT: &str = r#"
UPDATE events SET participant_limit = ? WHERE id = ?
"#;

pub async fn update_participant_limit(
    conn: &mut SqliteConnection,
    event_id: &str,
    participant_limit: Option<i64>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_PARTICIPANT_LIMIT)
        .bind(participant_limit)
        .bind(event_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}
