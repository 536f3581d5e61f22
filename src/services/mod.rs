pub mod event_service;
pub mod mode;
pub mod organization_service;
pub mod participation;
pub mod profile_service;
pub mod project_service;
pub mod visibility;
