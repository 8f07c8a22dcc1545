//! Database queries for recognition groups and their rosters.

use crate::models::{Group, Roster};
use sqlx::SqlitePool;

/// Get a group by identity. Always reads the current roster.
pub async fn get_group(pool: &SqlitePool, id: &str) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT id, people FROM recognition_groups WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert a group or replace its roster.
pub async fn upsert_group(pool: &SqlitePool, id: &str, roster: &Roster) -> Result<(), sqlx::Error> {
    let people = serde_json::to_string(roster).unwrap_or_else(|_| "{}".to_string());

    sqlx::query(
        r#"
        INSERT INTO recognition_groups (id, people)
        VALUES (?, ?)
        ON CONFLICT(id) DO UPDATE SET people = excluded.people
        "#,
    )
    .bind(id)
    .bind(people)
    .execute(pool)
    .await?;

    Ok(())
}
