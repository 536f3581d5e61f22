//! Per-viewer membership lookups, scoped to one event. Each kind is
//! independent; a profile can be speaker and team member at once.
//!
//! Generic over the executor so the command path can run the same checks
//! inside its transaction.

use sqlx::{Executor, Sqlite};

const SQL_IS_PARTICIPANT: &str = r#"
SELECT 1 FROM event_participants WHERE event_id = ? AND profile_id = ? LIMIT 1
"#;

const SQL_IS_ON_WAITING_LIST: &str = r#"
SELECT 1 FROM event_waiting_list WHERE event_id = ? AND profile_id = ? LIMIT 1
"#;

const SQL_IS_SPEAKER: &str = r#"
SELECT 1 FROM event_speakers WHERE event_id = ? AND profile_id = ? LIMIT 1
"#;

const SQL_IS_TEAM_MEMBER: &str = r#"
SELECT 1 FROM event_team_members WHERE event_id = ? AND profile_id = ? LIMIT 1
"#;

const SQL_IS_PRIVILEGED_TEAM_MEMBER: &str = r#"
SELECT 1 FROM event_team_members
WHERE event_id = ? AND profile_id = ? AND is_privileged = 1
LIMIT 1
"#;

async fn exists<'e, E>(
    executor: E,
    sql: &'static str,
    event_id: &str,
    profile_id: &str,
) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: Option<i64> = sqlx::query_scalar(sql)
        .bind(event_id)
        .bind(profile_id)
        .fetch_optional(executor)
        .await?;
    Ok(row.is_some())
}

pub async fn is_participant<'e, E>(executor: E, event_id: &str, profile_id: &str) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    exists(executor, SQL_IS_PARTICIPANT, event_id, profile_id).await
}

pub async fn is_on_waiting_list<'e, E>(
    executor: E,
    event_id: &str,
    profile_id: &str,
) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    exists(executor, SQL_IS_ON_WAITING_LIST, event_id, profile_id).await
}

pub async fn is_speaker<'e, E>(executor: E, event_id: &str, profile_id: &str) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    exists(executor, SQL_IS_SPEAKER, event_id, profile_id).await
}

pub async fn is_team_member<'e, E>(executor: E, event_id: &str, profile_id: &str) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    exists(executor, SQL_IS_TEAM_MEMBER, event_id, profile_id).await
}

pub async fn is_privileged_team_member<'e, E>(
    executor: E,
    event_id: &str,
    profile_id: &str,
) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    exists(executor, SQL_IS_PRIVILEGED_TEAM_MEMBER, event_id, profile_id).await
}
