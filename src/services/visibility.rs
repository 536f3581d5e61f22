//! Field-level visibility filtering for anonymous viewers.
//!
//! Every view carries the owner's visibility settings row; a flag set to
//! false blanks the corresponding field. Missing settings rows default to
//! all-false, so unknown data stays private. The filters mutate in place
//! and are idempotent.

use crate::services::event_service::{ChildEventView, EventView, ParentEventView};
use crate::services::organization_service::OrganizationView;
use crate::services::profile_service::{ProfilePreview, ProfileView};
use crate::services::project_service::ProjectView;

pub fn filter_profile(view: &mut ProfileView) {
    let v = view.visibility;
    if !v.academic_title {
        view.academic_title = None;
    }
    if !v.email {
        view.email = None;
    }
    if !v.phone {
        view.phone = None;
    }
    if !v.bio {
        view.bio = None;
    }
    if !v.position {
        view.position = None;
    }
    if !v.website {
        view.website = None;
    }
    if !v.areas {
        view.areas.clear();
    }
    if !v.offers {
        view.offers.clear();
    }
    if !v.seekings {
        view.seekings.clear();
    }
}

pub fn filter_profile_preview(preview: &mut ProfilePreview) {
    let v = preview.visibility;
    if !v.academic_title {
        preview.academic_title = None;
    }
    if !v.position {
        preview.position = None;
    }
}

pub fn filter_event(view: &mut EventView) {
    let v = view.visibility;
    if !v.subline {
        view.subline = None;
    }
    if !v.description {
        view.description = None;
    }
    if !v.venue {
        view.venue_name = None;
        view.venue_street = None;
        view.venue_street_number = None;
        view.venue_city = None;
        view.venue_zip_code = None;
    }
    if !v.background {
        view.background = None;
    }

    for participant in &mut view.participants {
        filter_profile_preview(participant);
    }
    for speaker in &mut view.speakers {
        filter_profile_preview(speaker);
    }
    for team_member in &mut view.team_members {
        filter_profile_preview(team_member);
    }
    if let Some(parent) = &mut view.parent_event {
        filter_parent_event(parent);
    }
    for child in &mut view.child_events {
        filter_child_event(child);
    }
}

pub fn filter_parent_event(view: &mut ParentEventView) {
    if !view.visibility.subline {
        view.subline = None;
    }
}

pub fn filter_child_event(view: &mut ChildEventView) {
    let v = view.visibility;
    if !v.subline {
        view.subline = None;
    }
    if !v.description {
        view.description = None;
    }
    if !v.background {
        view.background = None;
    }
}

pub fn filter_organization(view: &mut OrganizationView) {
    let v = view.visibility;
    if !v.bio {
        view.bio = None;
    }
    if !v.email {
        view.email = None;
    }
    if !v.phone {
        view.phone = None;
    }
    if !v.website {
        view.website = None;
    }

    for member in &mut view.members {
        filter_profile_preview(member);
    }
}

pub fn filter_project(view: &mut ProjectView) {
    let v = view.visibility;
    if !v.excerpt {
        view.excerpt = None;
    }
    if !v.description {
        view.description = None;
    }
    if !v.email {
        view.email = None;
    }
    if !v.phone {
        view.phone = None;
    }
    if !v.website {
        view.website = None;
    }

    for member in &mut view.team_members {
        filter_profile_preview(member);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileVisibilityRow;

    fn preview(visibility: ProfileVisibilityRow) -> ProfilePreview {
        ProfilePreview {
            id: "p1".to_string(),
            username: "anna".to_string(),
            first_name: "Anna".to_string(),
            last_name: "Schmidt".to_string(),
            academic_title: Some("Dr.".to_string()),
            position: Some("Lead".to_string()),
            avatar: Some("avatars/anna.jpg".to_string()),
            visibility,
        }
    }

    fn profile_view(visibility: ProfileVisibilityRow) -> ProfileView {
        ProfileView {
            id: "p1".to_string(),
            username: "anna".to_string(),
            first_name: "Anna".to_string(),
            last_name: "Schmidt".to_string(),
            academic_title: Some("Dr.".to_string()),
            email: Some("anna@example.org".to_string()),
            phone: Some("+49 30 1234".to_string()),
            bio: Some("bio".to_string()),
            position: Some("Lead".to_string()),
            website: Some("https://anna.example".to_string()),
            avatar: Some("avatars/anna.jpg".to_string()),
            background: None,
            areas: vec!["Berlin".to_string()],
            offers: vec!["Mentoring".to_string()],
            seekings: vec![],
            visibility,
        }
    }

    #[test]
    fn default_settings_hide_everything_filterable() {
        let mut view = profile_view(ProfileVisibilityRow::default());
        filter_profile(&mut view);

        assert_eq!(view.academic_title, None);
        assert_eq!(view.email, None);
        assert_eq!(view.phone, None);
        assert_eq!(view.bio, None);
        assert_eq!(view.position, None);
        assert_eq!(view.website, None);
        assert!(view.areas.is_empty());
        assert!(view.offers.is_empty());
        // Identity fields are never filtered.
        assert_eq!(view.first_name, "Anna");
        assert_eq!(view.username, "anna");
        assert!(view.avatar.is_some());
    }

    #[test]
    fn enabled_flags_keep_their_fields() {
        let mut view = profile_view(ProfileVisibilityRow {
            email: true,
            areas: true,
            ..Default::default()
        });
        filter_profile(&mut view);

        assert_eq!(view.email.as_deref(), Some("anna@example.org"));
        assert_eq!(view.areas, vec!["Berlin".to_string()]);
        assert_eq!(view.phone, None);
    }

    #[test]
    fn filtering_is_idempotent() {
        let mut view = profile_view(ProfileVisibilityRow {
            bio: true,
            ..Default::default()
        });
        filter_profile(&mut view);
        let once = format!("{:?}", view);
        filter_profile(&mut view);
        assert_eq!(once, format!("{:?}", view));
    }

    #[test]
    fn preview_filter_only_touches_title_and_position() {
        let mut p = preview(ProfileVisibilityRow::default());
        filter_profile_preview(&mut p);
        assert_eq!(p.academic_title, None);
        assert_eq!(p.position, None);
        assert_eq!(p.last_name, "Schmidt");
        assert!(p.avatar.is_some());

        let mut p = preview(ProfileVisibilityRow {
            academic_title: true,
            position: true,
            ..Default::default()
        });
        filter_profile_preview(&mut p);
        assert_eq!(p.academic_title.as_deref(), Some("Dr."));
        assert_eq!(p.position.as_deref(), Some("Lead"));
    }
}
