use sqlx::SqlitePool;

use crate::models::{OrganizationRow, OrganizationVisibilityRow, RelatedProfileRow};

const SQL_LOAD_ORGANIZATION_BY_SLUG: &str = r#"
SELECT
  id,
  slug,
  name,
  logo,
  background,
  bio,
  email,
  phone,
  website,
  city
FROM organizations
WHERE slug = ?
LIMIT 1
"#;

pub async fn load_organization_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> sqlx::Result<Option<OrganizationRow>> {
    sqlx::query_as::<_, OrganizationRow>(SQL_LOAD_ORGANIZATION_BY_SLUG)
        .bind(slug)
        .fetch_optional(pool)
        .await
}

const SQL_LOAD_ORGANIZATION_VISIBILITY: &str = r#"
SELECT bio, email, phone, website
FROM organization_visibilities
WHERE organization_id = ?
LIMIT 1
"#;

pub async fn load_organization_visibility(
    pool: &SqlitePool,
    organization_id: &str,
) -> sqlx::Result<Option<OrganizationVisibilityRow>> {
    sqlx::query_as::<_, OrganizationVisibilityRow>(SQL_LOAD_ORGANIZATION_VISIBILITY)
        .bind(organization_id)
        .fetch_optional(pool)
        .await
}

const SQL_LIST_ORGANIZATION_MEMBERS: &str = r#"
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
FROM organization_members r
JOIN profiles p ON p.id = r.profile_id
LEFT JOIN profile_visibilities v ON v.profile_id = p.id
WHERE r.organization_id = ?
ORDER BY p.first_name ASC, p.last_name ASC
"#;

pub async fn list_organization_members(
    pool: &SqlitePool,
    organization_id: &str,
) -> sqlx::Result<Vec<RelatedProfileRow>> {
    sqlx::query_as::<_, RelatedProfileRow>(SQL_LIST_ORGANIZATION_MEMBERS)
        .bind(organization_id)
        .fetch_all(pool)
        .await
}
