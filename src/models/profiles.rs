#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub academic_title: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub position: Option<String>,
    pub website: Option<String>,
    pub avatar: Option<String>,
    pub background: Option<String>,
}
