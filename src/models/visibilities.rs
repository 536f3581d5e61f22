// Per-entity field visibility settings. One row per entity, one boolean per
// protected field. The Default impls are all-false, which is what a missing
// settings row degrades to (private by default).

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct ProfileVisibilityRow {
    pub academic_title: bool,
    pub email: bool,
    pub phone: bool,
    pub bio: bool,
    pub position: bool,
    pub website: bool,
    pub areas: bool,
    pub offers: bool,
    pub seekings: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct EventVisibilityRow {
    pub subline: bool,
    pub description: bool,
    pub venue: bool,
    pub background: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct OrganizationVisibilityRow {
    pub bio: bool,
    pub email: bool,
    pub phone: bool,
    pub website: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct ProjectVisibilityRow {
    pub excerpt: bool,
    pub description: bool,
    pub email: bool,
    pub phone: bool,
    pub website: bool,
}
