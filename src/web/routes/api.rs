//! Versioned REST API for external consumers. Responses are always the
//! anonymous projection regardless of the API key used.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::AppError;
use crate::services::profile_service::{self, ProfileView};
use crate::services::project_service::{self, ProjectView};
use crate::AppState;

#[derive(Serialize)]
pub struct ApiProfile {
    #[serde(flatten)]
    pub profile: ProfileView,
    /// Canonical community URL of the entity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

pub async fn api_profile_handler(
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiProfile>, AppError> {
    let profile = profile_service::load_profile_view(&state.pool, &state.images, &username, true)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Profile with username {} not found", username)))?;

    let url = profile_service::canonical_url(
        state.config.community_base_url.as_deref(),
        &profile.username,
    );
    Ok(Json(ApiProfile { profile, url }))
}

#[derive(Serialize)]
pub struct ApiProject {
    #[serde(flatten)]
    pub project: ProjectView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

pub async fn api_project_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiProject>, AppError> {
    let project = project_service::load_project_view(&state.pool, &state.images, &slug, true)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Project with slug {} not found", slug)))?;

    let url =
        project_service::canonical_url(state.config.community_base_url.as_deref(), &project.slug);
    Ok(Json(ApiProject { project, url }))
}
