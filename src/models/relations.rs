// Profiles and organizations as they appear embedded in an event page,
// with their own visibility flags joined in (NULL means no settings row).

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RelatedProfileRow {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub academic_title: Option<String>,
    pub position: Option<String>,
    pub avatar: Option<String>,
    pub academic_title_public: Option<bool>,
    pub position_public: Option<bool>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventOrganizationRow {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub logo: Option<String>,
}
