//! Database queries for directory members.

use crate::models::Member;
use sqlx::SqlitePool;

/// Find every member carrying the given display name.
///
/// Display names are not guaranteed unique; callers decide what more than
/// one match means.
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Vec<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        "SELECT id, name, memberships FROM members WHERE name = ? ORDER BY id",
    )
    .bind(name)
    .fetch_all(pool)
    .await
}

/// Get a member by identity.
pub async fn get_member(pool: &SqlitePool, id: &str) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>("SELECT id, name, memberships FROM members WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert or replace a member with the given group memberships.
pub async fn upsert_member(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    groups: &[&str],
) -> Result<(), sqlx::Error> {
    let memberships = serde_json::to_string(groups).unwrap_or_else(|_| "[]".to_string());

    sqlx::query(
        r#"
        INSERT INTO members (id, name, memberships)
        VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            memberships = excluded.memberships
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(memberships)
    .execute(pool)
    .await?;

    Ok(())
}
