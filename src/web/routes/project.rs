use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::AppError;
use crate::services::project_service::{self, ProjectView};
use crate::web::middleware::auth::MaybeSessionUser;
use crate::AppState;

pub async fn project_handler(
    Extension(MaybeSessionUser(session)): Extension<MaybeSessionUser>,
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProjectView>, AppError> {
    let view =
        project_service::load_project_view(&state.pool, &state.images, &slug, session.is_none())
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    Ok(Json(view))
}
