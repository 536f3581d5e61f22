use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::project_repo;
use crate::error::AppError;
use crate::images::{ImageUrlBuilder, Transform};
use crate::models::ProjectVisibilityRow;
use crate::services::profile_service::ProfilePreview;
use crate::services::visibility;

#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub logo: Option<String>,
    pub background: Option<String>,
    pub excerpt: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub team_members: Vec<ProfilePreview>,
    #[serde(skip)]
    pub visibility: ProjectVisibilityRow,
}

pub async fn load_project_view(
    pool: &SqlitePool,
    images: &ImageUrlBuilder,
    slug: &str,
    anonymous: bool,
) -> Result<Option<ProjectView>, AppError> {
    let Some(row) = project_repo::load_project_by_slug(pool, slug).await? else {
        return Ok(None);
    };

    let visibility = project_repo::load_project_visibility(pool, &row.id)
        .await?
        .unwrap_or_default();
    let team_members = project_repo::list_project_team_members(pool, &row.id)
        .await?
        .into_iter()
        .map(ProfilePreview::from_row)
        .collect();

    let mut view = ProjectView {
        id: row.id,
        slug: row.slug,
        name: row.name,
        logo: row.logo,
        background: row.background,
        excerpt: row.excerpt,
        description: row.description,
        email: row.email,
        phone: row.phone,
        website: row.website,
        team_members,
        visibility,
    };

    if anonymous {
        visibility::filter_project(&mut view);
    }

    view.logo = images.url_opt(view.logo.as_deref(), Transform::logo());
    view.background = images.url_opt(view.background.as_deref(), Transform::wide_background());
    view.team_members = view
        .team_members
        .into_iter()
        .map(|m| m.with_avatar_url(images))
        .collect();

    Ok(Some(view))
}

pub fn canonical_url(base_url: Option<&str>, slug: &str) -> Option<String> {
    base_url.map(|base| format!("{}/project/{}", base, slug))
}
