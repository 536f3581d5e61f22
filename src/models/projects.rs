#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub logo: Option<String>,
    pub background: Option<String>,
    pub excerpt: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}
