use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::profile_repo;
use crate::error::AppError;
use crate::images::{ImageUrlBuilder, Transform};
use crate::models::{ProfileVisibilityRow, RelatedProfileRow};
use crate::services::visibility;

/// Full profile page / API projection. The visibility settings travel with
/// the view so the filter can be applied without further lookups; they are
/// never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub academic_title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub position: Option<String>,
    pub website: Option<String>,
    pub avatar: Option<String>,
    pub background: Option<String>,
    pub areas: Vec<String>,
    pub offers: Vec<String>,
    pub seekings: Vec<String>,
    #[serde(skip)]
    pub visibility: ProfileVisibilityRow,
}

/// Profile as embedded in event/organization/project listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePreview {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub academic_title: Option<String>,
    pub position: Option<String>,
    pub avatar: Option<String>,
    #[serde(skip)]
    pub visibility: ProfileVisibilityRow,
}

impl ProfilePreview {
    pub fn from_row(row: RelatedProfileRow) -> Self {
        // NULL flags mean the profile has no settings row: private.
        let visibility = ProfileVisibilityRow {
            academic_title: row.academic_title_public.unwrap_or(false),
            position: row.position_public.unwrap_or(false),
            ..Default::default()
        };
        Self {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            academic_title: row.academic_title,
            position: row.position,
            avatar: row.avatar,
            visibility,
        }
    }

    pub fn with_avatar_url(mut self, images: &ImageUrlBuilder) -> Self {
        self.avatar = images.url_opt(self.avatar.as_deref(), Transform::avatar());
        self
    }
}

pub async fn load_profile_view(
    pool: &SqlitePool,
    images: &ImageUrlBuilder,
    username: &str,
    anonymous: bool,
) -> Result<Option<ProfileView>, AppError> {
    let Some(row) = profile_repo::load_profile_by_username(pool, username).await? else {
        return Ok(None);
    };

    let visibility = profile_repo::load_profile_visibility(pool, &row.id)
        .await?
        .unwrap_or_default();
    let areas = profile_repo::list_profile_areas(pool, &row.id).await?;
    let offers = profile_repo::list_profile_offers(pool, &row.id).await?;
    let seekings = profile_repo::list_profile_seekings(pool, &row.id).await?;

    let mut view = ProfileView {
        id: row.id,
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        academic_title: row.academic_title,
        email: Some(row.email),
        phone: row.phone,
        bio: row.bio,
        position: row.position,
        website: row.website,
        avatar: row.avatar,
        background: row.background,
        areas,
        offers,
        seekings,
        visibility,
    };

    if anonymous {
        visibility::filter_profile(&mut view);
    }

    view.avatar = images.url_opt(view.avatar.as_deref(), Transform::avatar());
    view.background = images.url_opt(view.background.as_deref(), Transform::wide_background());

    Ok(Some(view))
}

pub fn canonical_url(base_url: Option<&str>, username: &str) -> Option<String> {
    base_url.map(|base| format!("{}/profile/{}", base, username))
}
