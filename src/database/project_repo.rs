use sqlx::SqlitePool;

use crate::models::{ProjectRow, ProjectVisibilityRow, RelatedProfileRow};

const SQL_LOAD_PROJECT_BY_SLUG: &str = r#"
SELECT
  id,
  slug,
  name,
  logo,
  background,
  excerpt,
  description,
  email,
  phone,
  website
FROM projects
WHERE slug = ?
LIMIT 1
"#;

pub async fn load_project_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> sqlx::Result<Option<ProjectRow>> {
    sqlx::query_as::<_, ProjectRow>(SQL_LOAD_PROJECT_BY_SLUG)
        .bind(slug)
        .fetch_optional(pool)
        .await
}

const SQL_LOAD_PROJECT_VISIBILITY: &str = r#"
SELECT excerpt, description, email, phone, website
FROM project_visibilities
WHERE project_id = ?
LIMIT 1
"#;

pub async fn load_project_visibility(
    pool: &SqlitePool,
    project_id: &str,
) -> sqlx::Result<Option<ProjectVisibilityRow>> {
    sqlx::query_as::<_, ProjectVisibilityRow>(SQL_LOAD_PROJECT_VISIBILITY)
        .bind(project_id)
        .fetch_optional(pool)
        .await
}

const SQL_LIST_PROJECT_TEAM_MEMBERS: &str = r#"
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
FROM project_team_members r
JOIN profiles p ON p.id = r.profile_id
LEFT JOIN profile_visibilities v ON v.profile_id = p.id
WHERE r.project_id = ?
ORDER BY p.first_name ASC, p.last_name ASC
"#;

pub async fn list_project_team_members(
    pool: &SqlitePool,
    project_id: &str,
) -> sqlx::Result<Vec<RelatedProfileRow>> {
    sqlx::query_as::<_, RelatedProfileRow>(SQL_LIST_PROJECT_TEAM_MEMBERS)
        .bind(project_id)
        .fetch_all(pool)
        .await
}
