use sqlx::SqlitePool;

use crate::models::{ProfileRow, ProfileVisibilityRow};

const SQL_LOAD_PROFILE_BY_USERNAME: &str = r#"
SELECT
  id,
  username,
  first_name,
  last_name,
  academic_title,
  email,
  phone,
  bio,
  position,
  website,
  avatar,
  background
FROM profiles
WHERE username = ?
LIMIT 1
"#;

pub async fn load_profile_by_username(
    pool: &SqlitePool,
    username: &str,
) -> sqlx::Result<Option<ProfileRow>> {
    sqlx::query_as::<_, ProfileRow>(SQL_LOAD_PROFILE_BY_USERNAME)
        .bind(username)
        .fetch_optional(pool)
        .await
}

const SQL_LOAD_PROFILE_VISIBILITY: &str = r#"
SELECT
  academic_title,
  email,
  phone,
  bio,
  position,
  website,
  areas,
  offers,
  seekings
FROM profile_visibilities
WHERE profile_id = ?
LIMIT 1
"#;

pub async fn load_profile_visibility(
    pool: &SqlitePool,
    profile_id: &str,
) -> sqlx::Result<Option<ProfileVisibilityRow>> {
    sqlx::query_as::<_, ProfileVisibilityRow>(SQL_LOAD_PROFILE_VISIBILITY)
        .bind(profile_id)
        .fetch_optional(pool)
        .await
}

const SQL_LIST_PROFILE_AREAS: &str = r#"
SELECT a.name
FROM profile_areas r
JOIN areas a ON a.id = r.area_id
WHERE r.profile_id = ?
ORDER BY a.name ASC
"#;

pub async fn list_profile_areas(pool: &SqlitePool, profile_id: &str) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar(SQL_LIST_PROFILE_AREAS)
        .bind(profile_id)
        .fetch_all(pool)
        .await
}

const SQL_LIST_PROFILE_OFFERS: &str = r#"
SELECT o.title
FROM profile_offers r
JOIN offers o ON o.id = r.offer_id
WHERE r.profile_id = ?
ORDER BY o.title ASC
"#;

pub async fn list_profile_offers(pool: &SqlitePool, profile_id: &str) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar(SQL_LIST_PROFILE_OFFERS)
        .bind(profile_id)
        .fetch_all(pool)
        .await
}

const SQL_LIST_PROFILE_SEEKINGS: &str = r#"
SELECT o.title
FROM profile_seekings r
JOIN offers o ON o.id = r.offer_id
WHERE r.profile_id = ?
ORDER BY o.title ASC
"#;

pub async fn list_profile_seekings(
    pool: &SqlitePool,
    profile_id: &str,
) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar(SQL_LIST_PROFILE_SEEKINGS)
        .bind(profile_id)
        .fetch_all(pool)
        .await
}
