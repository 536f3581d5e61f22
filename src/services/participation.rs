//! Pure participation rules: given the capacity/time facts of an event and
//! the viewer's memberships, derive the one action the viewer may take.
//! Everything here is a read-only projection; the mutations in
//! `event_service` re-validate against the database before writing.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Placeholder shown to eligible viewers while the conference link is not
/// set yet.
// TODO: the frontend could render this state itself; kept server-side for
// parity with the existing clients.
pub const CONFERENCE_LINK_PENDING: &str = "noch nicht bekannt";

/// The viewer's memberships for one event. Kinds are independent: a
/// speaker can also be a team member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParticipationStatus {
    pub is_participant: bool,
    pub is_on_waiting_list: bool,
    pub is_speaker: bool,
    pub is_team_member: bool,
}

impl ParticipationStatus {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.is_participant || self.is_on_waiting_list || self.is_speaker || self.is_team_member
    }
}

/// Capacity and time-window facts of one event, as loaded by the caller.
#[derive(Debug, Clone, Copy)]
pub struct ParticipationFacts {
    pub canceled: bool,
    pub participant_limit: Option<i64>,
    pub participant_count: i64,
    pub participation_from: DateTime<Utc>,
    pub participation_until: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationWindow {
    NotYetOpen,
    Open,
    Closed,
}

/// The single action a presentation layer offers for a viewer/event pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationAction {
    CanJoin,
    CanWaitlist,
    AlreadyJoined,
    AlreadyWaiting,
    ClosedBefore,
    ClosedAfter,
    Canceled,
}

pub fn registration_window(facts: &ParticipationFacts, now: DateTime<Utc>) -> RegistrationWindow {
    if now < facts.participation_from {
        RegistrationWindow::NotYetOpen
    } else if now > facts.participation_until {
        RegistrationWindow::Closed
    } else {
        RegistrationWindow::Open
    }
}

pub fn participant_limit_reached(facts: &ParticipationFacts) -> bool {
    match facts.participant_limit {
        Some(limit) => facts.participant_count >= limit,
        None => false,
    }
}

/// Precedence: cancellation, then the registration window, then existing
/// memberships, then capacity. Speakers and team members may not join
/// again, so they project to `AlreadyJoined`.
pub fn resolve_action(
    facts: &ParticipationFacts,
    status: &ParticipationStatus,
    now: DateTime<Utc>,
) -> ParticipationAction {
    if facts.canceled {
        return ParticipationAction::Canceled;
    }
    match registration_window(facts, now) {
        RegistrationWindow::NotYetOpen => return ParticipationAction::ClosedBefore,
        RegistrationWindow::Closed => return ParticipationAction::ClosedAfter,
        RegistrationWindow::Open => {}
    }
    if status.is_participant || status.is_speaker || status.is_team_member {
        return ParticipationAction::AlreadyJoined;
    }
    if status.is_on_waiting_list {
        return ParticipationAction::AlreadyWaiting;
    }
    if participant_limit_reached(facts) {
        ParticipationAction::CanWaitlist
    } else {
        ParticipationAction::CanJoin
    }
}

pub fn can_participate(
    facts: &ParticipationFacts,
    status: &ParticipationStatus,
    now: DateTime<Utc>,
) -> bool {
    resolve_action(facts, status, now) == ParticipationAction::CanJoin
}

pub fn can_join_waiting_list(
    facts: &ParticipationFacts,
    status: &ParticipationStatus,
    now: DateTime<Utc>,
) -> bool {
    resolve_action(facts, status, now) == ParticipationAction::CanWaitlist
}

/// The conference link is gated on membership, independent of the general
/// visibility filter.
pub fn can_access_conference_link(status: &ParticipationStatus) -> bool {
    status.is_participant || status.is_speaker || status.is_team_member
}

/// Apply the conference-link gate to a loaded link/code pair. Eligible
/// viewers with no link yet get the pending placeholder.
pub fn gated_conference_link(
    link: Option<String>,
    code: Option<String>,
    status: &ParticipationStatus,
) -> (Option<String>, Option<String>) {
    if !can_access_conference_link(status) {
        return (None, None);
    }
    match link {
        Some(link) if !link.is_empty() => (Some(link), code),
        _ => (Some(CONFERENCE_LINK_PENDING.to_string()), None),
    }
}
