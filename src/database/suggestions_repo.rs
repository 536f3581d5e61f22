use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::RelatedProfileRow;

/// Autocomplete source for the add-participant form: every query word must
/// match the full name or the email, and everyone already participating or
/// waiting for this event is skipped.
pub async fn search_participant_suggestions(
    pool: &SqlitePool,
    event_id: &str,
    query: &str,
) -> sqlx::Result<Vec<RelatedProfileRow>> {
    let mut builder = QueryBuilder::<Sqlite>::new(
        r#"
SELECT
  p.id,
  p.username,
  p.first_name,
  p.last_name,
  p.academic_title,
  p.position,
  p.avatar,
  v.academic_title AS academic_title_public,
  v.position AS position_public
FROM profiles p
LEFT JOIN profile_visibilities v ON v.profile_id = p.id
WHERE p.id NOT IN (SELECT profile_id FROM event_participants WHERE event_id = "#,
    );
    builder.push_bind(event_id);
    builder.push(")\n  AND p.id NOT IN (SELECT profile_id FROM event_waiting_list WHERE event_id = ");
    builder.push_bind(event_id);
    builder.push(")");

    for word in query.split_whitespace() {
        let pattern = format!("%{}%", word);
        builder.push("\n  AND (p.first_name || ' ' || p.last_name LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR p.email LIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }

    builder.push("\nORDER BY p.first_name ASC, p.last_name ASC\nLIMIT 6");
    builder
        .build_query_as::<RelatedProfileRow>()
        .fetch_all(pool)
        .await
}
