use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::event_membership_repo;

/// Coarse viewer privilege for one entity. Admin means "privileged team
/// member" of that entity; it gates mutations and draft visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Anon,
    Authenticated,
    Admin,
}

impl Mode {
    pub fn is_admin(self) -> bool {
        self == Mode::Admin
    }
}

pub async fn derive_event_mode(
    pool: &SqlitePool,
    event_id: &str,
    viewer: Option<&str>,
) -> sqlx::Result<Mode> {
    let Some(profile_id) = viewer else {
        return Ok(Mode::Anon);
    };
    if event_membership_repo::is_privileged_team_member(pool, event_id, profile_id).await? {
        Ok(Mode::Admin)
    } else {
        Ok(Mode::Authenticated)
    }
}
