use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
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
    pub venue_name: Option<String>,
    pub venue_street: Option<String>,
    pub venue_street_number: Option<String>,
    pub venue_city: Option<String>,
    pub venue_zip_code: Option<String>,
    pub conference_link: Option<String>,
    pub conference_code: Option<String>,
    pub background: Option<String>,
    pub canceled: bool,
    pub published: bool,
    pub parent_event_id: Option<String>,
}

/// Child event listing row with per-event counts and its own visibility
/// flags joined in (NULL flags mean "no settings row").
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChildEventRow {
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
    pub background: Option<String>,
    pub canceled: bool,
    pub published: bool,
    pub participant_count: i64,
    pub waiting_list_count: i64,
    pub subline_public: Option<bool>,
    pub description_public: Option<bool>,
    pub background_public: Option<bool>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParentEventRow {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub subline: Option<String>,
    pub subline_public: Option<bool>,
}
