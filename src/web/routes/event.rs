use axum::{
    extract::{Path, Query, State},
    Extension, Form, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::database::event_repo;
use crate::error::AppError;
use crate::services::event_service::{self, EventDetailView};
use crate::services::mode::{self, Mode};
use crate::services::profile_service::ProfilePreview;
use crate::web::middleware::auth::{MaybeSessionUser, SessionUser};
use crate::AppState;

pub async fn event_detail_handler(
    Extension(MaybeSessionUser(session)): Extension<MaybeSessionUser>,
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<EventDetailView>, AppError> {
    let viewer = session.as_ref().map(|s| s.id.as_str());
    let view = event_service::load_event_detail(&state.pool, &state.images, &slug, viewer, Utc::now())
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    Ok(Json(view))
}

async fn resolve_event_mode(
    pool: &SqlitePool,
    slug: &str,
    viewer: &str,
) -> Result<Mode, AppError> {
    let event = event_repo::load_event_by_slug(pool, slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    Ok(mode::derive_event_mode(pool, &event.id, Some(viewer)).await?)
}

/// Resolve who the command acts on. Acting on someone else requires event
/// admin rights.
async fn resolve_subject(
    pool: &SqlitePool,
    slug: &str,
    session: &SessionUser,
    requested: Option<String>,
) -> Result<String, AppError> {
    match requested {
        Some(profile_id) if profile_id != session.id => {
            if !resolve_event_mode(pool, slug, &session.id).await?.is_admin() {
                return Err(AppError::Forbidden(
                    "Only event admins may act for other profiles".to_string(),
                ));
            }
            Ok(profile_id)
        }
        _ => Ok(session.id.clone()),
    }
}

#[derive(Debug, Deserialize)]
pub struct ParticipantsForm {
    pub action: String, // join|leave
    pub profile_id: Option<String>,
}

pub async fn event_participants_handler(
    Extension(session): Extension<SessionUser>,
    Path(slug): Path<String>,
    State(state): State<AppState>,
    Form(form): Form<ParticipantsForm>,
) -> Result<Json<Value>, AppError> {
    let subject = resolve_subject(&state.pool, &slug, &session, form.profile_id).await?;

    match form.action.as_str() {
        "join" => event_service::join_event(&state.pool, &slug, &subject, Utc::now()).await?,
        "leave" => event_service::leave_event(&state.pool, &slug, &subject).await?,
        other => {
            return Err(AppError::field_validation(
                "action",
                format!("Unknown action: {}", other),
            ))
        }
    }
    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct WaitingListForm {
    pub action: String, // join|leave|move_to_participants
    pub profile_id: Option<String>,
}

pub async fn event_waiting_list_handler(
    Extension(session): Extension<SessionUser>,
    Path(slug): Path<String>,
    State(state): State<AppState>,
    Form(form): Form<WaitingListForm>,
) -> Result<Json<Value>, AppError> {
    if form.action == "move_to_participants"
        && !resolve_event_mode(&state.pool, &slug, &session.id)
            .await?
            .is_admin()
    {
        return Err(AppError::Forbidden(
            "Only event admins may move profiles off the waiting list".to_string(),
        ));
    }
    let subject = resolve_subject(&state.pool, &slug, &session, form.profile_id).await?;

    match form.action.as_str() {
        "join" => {
            event_service::join_waiting_list(&state.pool, &slug, &subject, Utc::now()).await?
        }
        "leave" => event_service::leave_waiting_list(&state.pool, &slug, &subject).await?,
        "move_to_participants" => {
            event_service::move_from_waiting_list(&state.pool, &slug, &subject).await?
        }
        other => {
            return Err(AppError::field_validation(
                "action",
                format!("Unknown action: {}", other),
            ))
        }
    }
    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct ParticipantLimitForm {
    pub participant_limit: Option<i64>,
}

pub async fn event_participant_limit_handler(
    Extension(session): Extension<SessionUser>,
    Path(slug): Path<String>,
    State(state): State<AppState>,
    Form(form): Form<ParticipantLimitForm>,
) -> Result<Json<Value>, AppError> {
    if !resolve_event_mode(&state.pool, &slug, &session.id)
        .await?
        .is_admin()
    {
        return Err(AppError::Forbidden(
            "Only event admins may change the participant limit".to_string(),
        ));
    }

    event_service::update_participant_limit(&state.pool, &slug, form.participant_limit).await?;
    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    pub query: Option<String>,
}

pub async fn participant_suggestions_handler(
    Extension(session): Extension<SessionUser>,
    Path(slug): Path<String>,
    Query(query): Query<SuggestionsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfilePreview>>, AppError> {
    let event = event_repo::load_event_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    if !mode::derive_event_mode(&state.pool, &event.id, Some(&session.id))
        .await?
        .is_admin()
    {
        return Err(AppError::Forbidden(
            "Only event admins may search for participants".to_string(),
        ));
    }

    let query = query.query.unwrap_or_default();
    if query.trim().len() < 3 {
        return Ok(Json(Vec::new()));
    }

    let suggestions =
        event_service::participant_suggestions(&state.pool, &state.images, &event.id, query.trim())
            .await?;
    Ok(Json(suggestions))
}
