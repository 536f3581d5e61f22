use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::organization_repo;
use crate::error::AppError;
use crate::images::{ImageUrlBuilder, Transform};
use crate::models::{EventOrganizationRow, OrganizationVisibilityRow};
use crate::services::profile_service::ProfilePreview;
use crate::services::visibility;

#[derive(Debug, Clone, Serialize)]
pub struct OrganizationView {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub logo: Option<String>,
    pub background: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub members: Vec<ProfilePreview>,
    #[serde(skip)]
    pub visibility: OrganizationVisibilityRow,
}

/// Organization as embedded in an event's "hosted by" listing. Only
/// non-sensitive linking fields, nothing to filter.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationPreview {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub logo: Option<String>,
}

impl OrganizationPreview {
    pub fn from_row(row: EventOrganizationRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            logo: row.logo,
        }
    }

    pub fn with_logo_url(mut self, images: &ImageUrlBuilder) -> Self {
        self.logo = images.url_opt(self.logo.as_deref(), Transform::logo());
        self
    }
}

pub async fn load_organization_view(
    pool: &SqlitePool,
    images: &ImageUrlBuilder,
    slug: &str,
    anonymous: bool,
) -> Result<Option<OrganizationView>, AppError> {
    let Some(row) = organization_repo::load_organization_by_slug(pool, slug).await? else {
        return Ok(None);
    };

    let visibility = organization_repo::load_organization_visibility(pool, &row.id)
        .await?
        .unwrap_or_default();
    let members = organization_repo::list_organization_members(pool, &row.id)
        .await?
        .into_iter()
        .map(ProfilePreview::from_row)
        .collect();

    let mut view = OrganizationView {
        id: row.id,
        slug: row.slug,
        name: row.name,
        logo: row.logo,
        background: row.background,
        bio: row.bio,
        email: row.email,
        phone: row.phone,
        website: row.website,
        city: row.city,
        members,
        visibility,
    };

    if anonymous {
        visibility::filter_organization(&mut view);
    }

    view.logo = images.url_opt(view.logo.as_deref(), Transform::logo());
    view.background = images.url_opt(view.background.as_deref(), Transform::wide_background());
    view.members = view
        .members
        .into_iter()
        .map(|m| m.with_avatar_url(images))
        .collect();

    Ok(Some(view))
}
