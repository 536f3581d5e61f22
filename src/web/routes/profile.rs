use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::AppError;
use crate::services::profile_service::{self, ProfileView};
use crate::web::middleware::auth::MaybeSessionUser;
use crate::AppState;

pub async fn profile_handler(
    Extension(MaybeSessionUser(session)): Extension<MaybeSessionUser>,
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProfileView>, AppError> {
    let view =
        profile_service::load_profile_view(&state.pool, &state.images, &username, session.is_none())
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(view))
}
