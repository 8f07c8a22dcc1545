//! Database queries for nomination events.

use crate::models::Event;
use sqlx::{Row, SqliteConnection, SqlitePool};

const EVENT_COLUMNS: &str =
    "id, nominee_id, nominee_name, group_id, points, description, approved, created_at, approved_at";

/// Insert a new event. Takes a connection so it can join a transaction.
pub async fn insert_event(conn: &mut SqliteConnection, event: &Event) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO events (id, nominee_id, nominee_name, group_id, points, description, approved, created_at, approved_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&event.id)
    .bind(&event.nominee_id)
    .bind(&event.nominee_name)
    .bind(&event.group_id)
    .bind(event.points)
    .bind(&event.description)
    .bind(event.approved)
    .bind(event.created_at)
    .bind(event.approved_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Get an event by ID.
pub async fn get_event(pool: &SqlitePool, id: &str) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Flip a pending event to approved.
///
/// Guarded on `approved = 0`, so the transition happens at most once.
/// Returns `true` if this call performed it.
pub async fn mark_approved(
    pool: &SqlitePool,
    id: &str,
    approved_at: i64,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE events SET approved = 1, approved_at = ? WHERE id = ? AND approved = 0")
            .bind(approved_at)
            .bind(id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() == 1)
}

/// Nominee name and points of every approved event in a group, in creation order.
pub async fn list_approved_points(
    pool: &SqlitePool,
    group_id: &str,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT nominee_name, points
        FROM events
        WHERE group_id = ? AND approved = 1
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| (row.get("nominee_name"), row.get("points")))
        .collect())
}

/// Events that own no ballots at all.
pub async fn list_without_ballots(pool: &SqlitePool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!(
        r#"
        SELECT {}
        FROM events e
        WHERE NOT EXISTS (SELECT 1 FROM ballots b WHERE b.event_id = e.id)
        ORDER BY e.created_at ASC, e.rowid ASC
        "#,
        EVENT_COLUMNS
    ))
    .fetch_all(pool)
    .await
}
