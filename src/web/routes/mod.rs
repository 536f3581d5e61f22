pub mod api;
pub mod event;
pub mod organization;
pub mod profile;
pub mod project;
