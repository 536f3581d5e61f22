use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::AppError;
use crate::services::organization_service::{self, OrganizationView};
use crate::web::middleware::auth::MaybeSessionUser;
use crate::AppState;

pub async fn organization_handler(
    Extension(MaybeSessionUser(session)): Extension<MaybeSessionUser>,
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<OrganizationView>, AppError> {
    let view = organization_service::load_organization_view(
        &state.pool,
        &state.images,
        &slug,
        session.is_none(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;
    Ok(Json(view))
}
