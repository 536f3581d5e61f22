use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::{
    event_membership_repo, event_repo, participant_commands_repo, suggestions_repo,
};
use crate::error::AppError;
use crate::images::{ImageUrlBuilder, Transform};
use crate::models::{ChildEventRow, EventRow, EventVisibilityRow, ParentEventRow};
use crate::services::mode::{self, Mode};
use crate::services::organization_service::OrganizationPreview;
use crate::services::participation::{
    self, ParticipationAction, ParticipationFacts, ParticipationStatus,
};
use crate::services::profile_service::ProfilePreview;
use crate::services::visibility;

#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub subline: Option<String>,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub participation_from: DateTime<Utc>,
    pub participation_until: DateTime<Utc>,
    pub participant_limit: Option<i64>,
    pub participant_count: i64,
    pub waiting_list_count: i64,
    pub venue_name: Option<String>,
    pub venue_street: Option<String>,
    pub venue_street_number: Option<String>,
    pub venue_city: Option<String>,
    pub venue_zip_code: Option<String>,
    pub conference_link: Option<String>,
    pub conference_code: Option<String>,
    pub background: Option<String>,
    pub blurred_background: Option<String>,
    pub canceled: bool,
    pub published: bool,
    pub parent_event: Option<ParentEventView>,
    pub child_events: Vec<ChildEventView>,
    pub participants: Vec<ProfilePreview>,
    pub speakers: Vec<ProfilePreview>,
    pub team_members: Vec<ProfilePreview>,
    pub responsible_organizations: Vec<OrganizationPreview>,
    #[serde(skip)]
    pub visibility: EventVisibilityRow,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParentEventView {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub subline: Option<String>,
    #[serde(skip)]
    pub visibility: EventVisibilityRow,
}

impl ParentEventView {
    fn from_row(row: ParentEventRow) -> Self {
        let visibility = EventVisibilityRow {
            subline: row.subline_public.unwrap_or(false),
            ..Default::default()
        };
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            subline: row.subline,
            visibility,
        }
    }
}

/// Child event card, including the viewer's own relationship to it so a
/// parent page can offer join/waitlist per child directly.
#[derive(Debug, Clone, Serialize)]
pub struct ChildEventView {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub subline: Option<String>,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub participation_from: DateTime<Utc>,
    pub participation_until: DateTime<Utc>,
    pub participant_limit: Option<i64>,
    pub participant_count: i64,
    pub waiting_list_count: i64,
    pub background: Option<String>,
    pub blurred_background: Option<String>,
    pub canceled: bool,
    pub published: bool,
    pub is_participant: bool,
    pub is_on_waiting_list: bool,
    pub action: ParticipationAction,
    #[serde(skip)]
    pub visibility: EventVisibilityRow,
}

#[derive(Debug, Serialize)]
pub struct EventDetailView {
    pub mode: Mode,
    pub is_participant: bool,
    pub is_on_waiting_list: bool,
    pub is_speaker: bool,
    pub is_team_member: bool,
    pub action: ParticipationAction,
    pub event: EventView,
}

fn facts_of_event(event: &EventRow, participant_count: i64) -> ParticipationFacts {
    ParticipationFacts {
        canceled: event.canceled,
        participant_limit: event.participant_limit,
        participant_count,
        participation_from: event.participation_from,
        participation_until: event.participation_until,
    }
}

fn facts_of_child(child: &ChildEventRow) -> ParticipationFacts {
    ParticipationFacts {
        canceled: child.canceled,
        participant_limit: child.participant_limit,
        participant_count: child.participant_count,
        participation_from: child.participation_from,
        participation_until: child.participation_until,
    }
}

async fn load_status(
    pool: &SqlitePool,
    event_id: &str,
    viewer: Option<&str>,
) -> sqlx::Result<ParticipationStatus> {
    let Some(profile_id) = viewer else {
        return Ok(ParticipationStatus::anonymous());
    };
    Ok(ParticipationStatus {
        is_participant: event_membership_repo::is_participant(pool, event_id, profile_id).await?,
        is_on_waiting_list: event_membership_repo::is_on_waiting_list(pool, event_id, profile_id)
            .await?,
        is_speaker: event_membership_repo::is_speaker(pool, event_id, profile_id).await?,
        is_team_member: event_membership_repo::is_team_member(pool, event_id, profile_id).await?,
    })
}

/// The event page projection: memberships, permitted action, child events
/// filtered by publish state, visibility-filtered relations for anonymous
/// viewers, derived image URLs and the gated conference link.
pub async fn load_event_detail(
    pool: &SqlitePool,
    images: &ImageUrlBuilder,
    slug: &str,
    viewer: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<EventDetailView>, AppError> {
    let Some(event) = event_repo::load_event_by_slug(pool, slug).await? else {
        return Ok(None);
    };

    let viewer_mode = mode::derive_event_mode(pool, &event.id, viewer).await?;
    let status = load_status(pool, &event.id, viewer).await?;

    if !event.published && !viewer_mode.is_admin() && !status.is_team_member {
        return Err(AppError::Forbidden("Event not published".to_string()));
    }

    let event_visibility = event_repo::load_event_visibility(pool, &event.id)
        .await?
        .unwrap_or_default();
    let participant_count = event_repo::count_participants(pool, &event.id).await?;
    let waiting_list_count = event_repo::count_waiting_list(pool, &event.id).await?;
    let children = event_repo::list_child_events(pool, &event.id).await?;

    // Participants and speakers: full-depth over the descendant tree while
    // the event has children, direct listings otherwise.
    let (participants, speakers) = if children.is_empty() {
        (
            event_repo::list_participants(pool, &event.id).await?,
            event_repo::list_speakers(pool, &event.id).await?,
        )
    } else {
        (
            event_repo::list_full_depth_participants(pool, &event.id).await?,
            event_repo::list_full_depth_speakers(pool, &event.id).await?,
        )
    };
    // Displayed count follows the listing; capacity checks keep using the
    // event's own direct count.
    let displayed_participant_count = if children.is_empty() {
        participant_count
    } else {
        participants.len() as i64
    };
    let team_members = event_repo::list_team_members(pool, &event.id).await?;
    let organizations = event_repo::list_responsible_organizations(pool, &event.id).await?;

    let parent_event = match &event.parent_event_id {
        Some(parent_id) => event_repo::load_parent_event(pool, parent_id)
            .await?
            .map(ParentEventView::from_row),
        None => None,
    };

    // Publish filtering happens before visibility filtering: a dropped
    // child never reaches the anonymous projection at all.
    let mut child_views = Vec::new();
    for child in children {
        if !child.published {
            let Some(profile_id) = viewer else {
                continue;
            };
            let child_admin =
                event_membership_repo::is_privileged_team_member(pool, &child.id, profile_id)
                    .await?;
            let child_team =
                event_membership_repo::is_team_member(pool, &child.id, profile_id).await?;
            if !child_admin && !child_team {
                continue;
            }
        }

        let child_status = match viewer {
            Some(profile_id) => ParticipationStatus {
                is_participant: event_membership_repo::is_participant(
                    pool, &child.id, profile_id,
                )
                .await?,
                is_on_waiting_list: event_membership_repo::is_on_waiting_list(
                    pool, &child.id, profile_id,
                )
                .await?,
                ..Default::default()
            },
            None => ParticipationStatus::anonymous(),
        };
        let action = participation::resolve_action(&facts_of_child(&child), &child_status, now);

        let visibility = EventVisibilityRow {
            subline: child.subline_public.unwrap_or(false),
            description: child.description_public.unwrap_or(false),
            background: child.background_public.unwrap_or(false),
            ..Default::default()
        };
        child_views.push(ChildEventView {
            id: child.id,
            slug: child.slug,
            name: child.name,
            subline: child.subline,
            description: child.description,
            start_time: child.start_time,
            end_time: child.end_time,
            participation_from: child.participation_from,
            participation_until: child.participation_until,
            participant_limit: child.participant_limit,
            participant_count: child.participant_count,
            waiting_list_count: child.waiting_list_count,
            background: child.background,
            blurred_background: None,
            canceled: child.canceled,
            published: child.published,
            is_participant: child_status.is_participant,
            is_on_waiting_list: child_status.is_on_waiting_list,
            action,
            visibility,
        });
    }

    let mut view = EventView {
        id: event.id.clone(),
        slug: event.slug.clone(),
        name: event.name.clone(),
        subline: event.subline.clone(),
        description: event.description.clone(),
        start_time: event.start_time,
        end_time: event.end_time,
        participation_from: event.participation_from,
        participation_until: event.participation_until,
        participant_limit: event.participant_limit,
        participant_count: displayed_participant_count,
        waiting_list_count,
        venue_name: event.venue_name.clone(),
        venue_street: event.venue_street.clone(),
        venue_street_number: event.venue_street_number.clone(),
        venue_city: event.venue_city.clone(),
        venue_zip_code: event.venue_zip_code.clone(),
        conference_link: event.conference_link.clone(),
        conference_code: event.conference_code.clone(),
        background: event.background.clone(),
        blurred_background: None,
        canceled: event.canceled,
        published: event.published,
        parent_event,
        child_events: child_views,
        participants: participants.into_iter().map(ProfilePreview::from_row).collect(),
        speakers: speakers.into_iter().map(ProfilePreview::from_row).collect(),
        team_members: team_members.into_iter().map(ProfilePreview::from_row).collect(),
        responsible_organizations: organizations
            .into_iter()
            .map(OrganizationPreview::from_row)
            .collect(),
        visibility: event_visibility,
    };

    if viewer.is_none() {
        visibility::filter_event(&mut view);
    }

    enhance_event_images(&mut view, images);

    let (conference_link, conference_code) =
        participation::gated_conference_link(view.conference_link, view.conference_code, &status);
    view.conference_link = conference_link;
    view.conference_code = conference_code;

    let action = participation::resolve_action(&facts_of_event(&event, participant_count), &status, now);

    Ok(Some(EventDetailView {
        mode: viewer_mode,
        is_participant: status.is_participant,
        is_on_waiting_list: status.is_on_waiting_list,
        is_speaker: status.is_speaker,
        is_team_member: status.is_team_member,
        action,
        event: view,
    }))
}

fn enhance_event_images(view: &mut EventView, images: &ImageUrlBuilder) {
    view.blurred_background =
        images.url_opt(view.background.as_deref(), Transform::blurred_background());
    view.background = images.url_opt(view.background.as_deref(), Transform::background());

    for child in &mut view.child_events {
        child.blurred_background =
            images.url_opt(child.background.as_deref(), Transform::blurred_card());
        child.background = images.url_opt(child.background.as_deref(), Transform::card());
    }

    view.participants = std::mem::take(&mut view.participants)
        .into_iter()
        .map(|p| p.with_avatar_url(images))
        .collect();
    view.speakers = std::mem::take(&mut view.speakers)
        .into_iter()
        .map(|p| p.with_avatar_url(images))
        .collect();
    view.team_members = std::mem::take(&mut view.team_members)
        .into_iter()
        .map(|p| p.with_avatar_url(images))
        .collect();
    view.responsible_organizations = std::mem::take(&mut view.responsible_organizations)
        .into_iter()
        .map(|o| o.with_logo_url(images))
        .collect();
}

/// Join an event as participant. The checks run again inside the
/// transaction; the unique key plus the recount after the insert are the
/// authoritative capacity enforcement under concurrent joins.
pub async fn join_event(
    pool: &SqlitePool,
    slug: &str,
    profile_id: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let event = participant_commands_repo::load_event_for_update(&mut tx, slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let count = participant_commands_repo::count_participants(&mut tx, &event.id).await?;
    validate_joinable(&facts_of_event(&event, count), now)?;
    if event_membership_repo::is_on_waiting_list(&mut *tx, &event.id, profile_id).await? {
        return Err(AppError::validation("Already on the waiting list"));
    }
    if participation::participant_limit_reached(&facts_of_event(&event, count)) {
        return Err(AppError::validation(
            "The event has reached its participant limit — join the waiting list instead",
        ));
    }

    let insert = participant_commands_repo::insert_participant(&mut tx, &event.id, profile_id).await;
    map_unique_violation(insert, "Already participating in this event")?;

    // Recount after the write: two requests can pass the pre-check at the
    // same time, only one of them may keep its row.
    let count = participant_commands_repo::count_participants(&mut tx, &event.id).await?;
    if let Some(limit) = event.participant_limit {
        if count > limit {
            tx.rollback().await?;
            return Err(AppError::validation(
                "The event just reached its participant limit — please re-check the current participant count",
            ));
        }
    }

    tx.commit().await?;
    Ok(())
}

pub async fn leave_event(pool: &SqlitePool, slug: &str, profile_id: &str) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    let event = participant_commands_repo::load_event_for_update(&mut tx, slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    let removed =
        participant_commands_repo::delete_participant(&mut tx, &event.id, profile_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("Participation not found".to_string()));
    }
    tx.commit().await?;
    Ok(())
}

/// Join the waiting list. Only meaningful while the event is full.
pub async fn join_waiting_list(
    pool: &SqlitePool,
    slug: &str,
    profile_id: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let event = participant_commands_repo::load_event_for_update(&mut tx, slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let count = participant_commands_repo::count_participants(&mut tx, &event.id).await?;
    validate_joinable(&facts_of_event(&event, count), now)?;
    if event_membership_repo::is_participant(&mut *tx, &event.id, profile_id).await? {
        return Err(AppError::validation("Already participating in this event"));
    }
    if !participation::participant_limit_reached(&facts_of_event(&event, count)) {
        return Err(AppError::validation(
            "There are still free seats — join the event directly",
        ));
    }

    let insert =
        participant_commands_repo::insert_waiting_list_entry(&mut tx, &event.id, profile_id).await;
    map_unique_violation(insert, "Already on the waiting list")?;

    tx.commit().await?;
    Ok(())
}

pub async fn leave_waiting_list(
    pool: &SqlitePool,
    slug: &str,
    profile_id: &str,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    let event = participant_commands_repo::load_event_for_update(&mut tx, slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    let removed =
        participant_commands_repo::delete_waiting_list_entry(&mut tx, &event.id, profile_id)
            .await?;
    if removed == 0 {
        return Err(AppError::NotFound("Waiting list entry not found".to_string()));
    }
    tx.commit().await?;
    Ok(())
}

/// Admin action: promote a waiting profile to participant. Deliberately
/// ignores the capacity limit — admins may over-fill an event by hand.
pub async fn move_from_waiting_list(
    pool: &SqlitePool,
    slug: &str,
    profile_id: &str,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    let event = participant_commands_repo::load_event_for_update(&mut tx, slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let removed =
        participant_commands_repo::delete_waiting_list_entry(&mut tx, &event.id, profile_id)
            .await?;
    if removed == 0 {
        return Err(AppError::NotFound("Waiting list entry not found".to_string()));
    }

    let insert = participant_commands_repo::insert_participant(&mut tx, &event.id, profile_id).await;
    map_unique_violation(insert, "Already participating in this event")?;

    tx.commit().await?;
    Ok(())
}

/// Admin action: change the participant limit. Zero or negative clears it.
pub async fn update_participant_limit(
    pool: &SqlitePool,
    slug: &str,
    participant_limit: Option<i64>,
) -> Result<(), AppError> {
    let participant_limit = participant_limit.filter(|limit| *limit > 0);

    let mut tx = pool.begin().await?;
    let event = participant_commands_repo::load_event_for_update(&mut tx, slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    if let Some(limit) = participant_limit {
        let count = participant_commands_repo::count_participants(&mut tx, &event.id).await?;
        if count > limit {
            return Err(AppError::field_validation(
                "participant_limit",
                "More people currently participate than the proposed limit — move the surplus to the waiting list first",
            ));
        }
    }

    participant_commands_repo::update_participant_limit(&mut tx, &event.id, participant_limit)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// Autocomplete source for the admin add-participant form.
pub async fn participant_suggestions(
    pool: &SqlitePool,
    images: &ImageUrlBuilder,
    event_id: &str,
    query: &str,
) -> Result<Vec<ProfilePreview>, AppError> {
    let rows = suggestions_repo::search_participant_suggestions(pool, event_id, query).await?;
    Ok(rows
        .into_iter()
        .map(|row| ProfilePreview::from_row(row).with_avatar_url(images))
        .collect())
}

fn validate_joinable(facts: &ParticipationFacts, now: DateTime<Utc>) -> Result<(), AppError> {
    if facts.canceled {
        return Err(AppError::validation("The event was canceled"));
    }
    match participation::registration_window(facts, now) {
        participation::RegistrationWindow::NotYetOpen => {
            Err(AppError::validation("Registration has not started yet"))
        }
        participation::RegistrationWindow::Closed => {
            Err(AppError::validation("Registration is already closed"))
        }
        participation::RegistrationWindow::Open => Ok(()),
    }
}

fn map_unique_violation(result: sqlx::Result<u64>, message: &str) -> Result<u64, AppError> {
    match result {
        Ok(rows) => Ok(rows),
        Err(e) => {
            let is_unique = e
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false);
            if is_unique {
                Err(AppError::validation(message))
            } else {
                Err(AppError::Database(e))
            }
        }
    }
}
