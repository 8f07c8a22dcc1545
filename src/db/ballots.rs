//! Database queries for review ballots.

use crate::models::{Ballot, Event, PendingReview};
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

const BALLOT_COLUMNS: &str = "id, event_id, nominee_id, nominee_name, reviewer_id, reviewer_name, reviewed, approved, created_at, reviewed_at";

/// Insert a batch of ballots on one connection (usually a transaction).
pub async fn insert_ballots(
    conn: &mut SqliteConnection,
    ballots: &[Ballot],
) -> Result<(), sqlx::Error> {
    insert_with(conn, "INSERT", ballots).await?;
    Ok(())
}

/// Insert ballots, skipping any reviewer that already holds one for the event.
///
/// Returns the number of rows actually written.
pub async fn insert_missing_ballots(
    conn: &mut SqliteConnection,
    ballots: &[Ballot],
) -> Result<u64, sqlx::Error> {
    insert_with(conn, "INSERT OR IGNORE", ballots).await
}

async fn insert_with(
    conn: &mut SqliteConnection,
    verb: &str,
    ballots: &[Ballot],
) -> Result<u64, sqlx::Error> {
    let sql = format!(
        r#"
        {} INTO ballots (id, event_id, nominee_id, nominee_name, reviewer_id, reviewer_name, reviewed, approved, created_at, reviewed_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        verb
    );

    let mut inserted = 0;
    for ballot in ballots {
        let result = sqlx::query(&sql)
            .bind(&ballot.id)
            .bind(&ballot.event_id)
            .bind(&ballot.nominee_id)
            .bind(&ballot.nominee_name)
            .bind(&ballot.reviewer_id)
            .bind(&ballot.reviewer_name)
            .bind(ballot.reviewed)
            .bind(ballot.approved)
            .bind(ballot.created_at)
            .bind(ballot.reviewed_at)
            .execute(&mut *conn)
            .await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}

/// Get a ballot by ID.
pub async fn get_ballot(pool: &SqlitePool, id: &str) -> Result<Option<Ballot>, sqlx::Error> {
    sqlx::query_as::<_, Ballot>(&format!("SELECT {} FROM ballots WHERE id = ?", BALLOT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// All ballots for an event.
pub async fn list_for_event(
    pool: &SqlitePool,
    event_id: &str,
) -> Result<Vec<Ballot>, sqlx::Error> {
    sqlx::query_as::<_, Ballot>(&format!(
        "SELECT {} FROM ballots WHERE event_id = ? ORDER BY reviewer_id",
        BALLOT_COLUMNS
    ))
    .bind(event_id)
    .fetch_all(pool)
    .await
}

/// Write a decision onto an unreviewed ballot.
///
/// Compare-and-swap on `reviewed`: returns `false` when the ballot is unknown
/// or already carries a decision, leaving the stored verdict untouched.
pub async fn record_decision(
    pool: &SqlitePool,
    id: &str,
    approved: bool,
    reviewed_at: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE ballots SET reviewed = 1, approved = ?, reviewed_at = ? WHERE id = ? AND reviewed = 0",
    )
    .bind(approved)
    .bind(reviewed_at)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Number of approving ballots for an event.
pub async fn count_approved(pool: &SqlitePool, event_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM ballots WHERE event_id = ? AND approved = 1")
        .bind(event_id)
        .fetch_one(pool)
        .await
}

/// Unreviewed ballots of a reviewer joined to their events in `group_id`.
///
/// Ballots whose event row is missing are dropped.
pub async fn list_pending_for_reviewer(
    pool: &SqlitePool,
    group_id: &str,
    reviewer_id: &str,
) -> Result<Vec<PendingReview>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            b.id, b.event_id, b.nominee_id, b.nominee_name, b.reviewer_id, b.reviewer_name,
            b.reviewed, b.approved, b.created_at, b.reviewed_at,
            e.id AS ev_id, e.nominee_id AS ev_nominee_id, e.nominee_name AS ev_nominee_name,
            e.group_id AS ev_group_id, e.points AS ev_points, e.description AS ev_description,
            e.approved AS ev_approved, e.created_at AS ev_created_at, e.approved_at AS ev_approved_at
        FROM ballots b
        LEFT JOIN events e ON e.id = b.event_id
        WHERE b.reviewer_id = ?
          AND b.reviewed = 0
          AND (e.id IS NULL OR e.group_id = ?)
        ORDER BY b.created_at ASC, b.rowid ASC
        "#,
    )
    .bind(reviewer_id)
    .bind(group_id)
    .fetch_all(pool)
    .await?;

    let mut pending = Vec::with_capacity(rows.len());
    for row in rows {
        let ballot = Ballot::from_row(&row)?;

        let Some(event_id) = row.try_get::<Option<String>, _>("ev_id")? else {
            log::debug!(
                "[ledger] Dropping ballot {} with missing event {}",
                ballot.id,
                ballot.event_id
            );
            continue;
        };

        let event = Event {
            id: event_id,
            nominee_id: row.try_get("ev_nominee_id")?,
            nominee_name: row.try_get("ev_nominee_name")?,
            group_id: row.try_get("ev_group_id")?,
            points: row.try_get("ev_points")?,
            description: row.try_get("ev_description")?,
            approved: row.try_get("ev_approved")?,
            created_at: row.try_get("ev_created_at")?,
            approved_at: row.try_get("ev_approved_at")?,
        };

        pending.push(PendingReview { ballot, event });
    }

    Ok(pending)
}
