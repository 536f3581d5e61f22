pub mod event_membership_repo;
pub mod event_repo;
pub mod organization_repo;
pub mod participant_commands_repo;
pub mod profile_repo;
pub mod project_repo;
pub mod suggestions_repo;
