pub mod events;
pub mod organizations;
pub mod profiles;
pub mod projects;
pub mod relations;
pub mod visibilities;

pub use events::{ChildEventRow, EventRow, ParentEventRow};
pub use organizations::OrganizationRow;
pub use profiles::ProfileRow;
pub use projects::ProjectRow;
pub use relations::{EventOrganizationRow, RelatedProfileRow};
pub use visibilities::{
    EventVisibilityRow, OrganizationVisibilityRow, ProfileVisibilityRow, ProjectVisibilityRow,
};
