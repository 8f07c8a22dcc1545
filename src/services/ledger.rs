//! Review ledger.
//!
//! Records each reviewer's decision exactly once and re-runs quorum
//! evaluation for the affected event after every successful write.

use crate::config::WorkflowSettings;
use crate::db::pool::DbPool;
use crate::db::{self, ballots, events};
use crate::error::AppError;
use crate::models::PendingReview;
use crate::services::quorum::{self, QuorumOutcome};

/// Record a reviewer's decision on a ballot.
///
/// A ballot that already carries a decision is never overwritten; the second
/// attempt fails with `AlreadyReviewed`. Once the decision is durable the
/// event's quorum is re-evaluated against its own group's roster. A failure
/// during evaluation does not undo the recorded decision.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `settings` - Workflow settings (quorum threshold)
/// * `ballot_id` - Ballot being decided
/// * `approved` - The reviewer's vote
///
/// # Returns
/// The post-decision quorum outcome for the ballot's event
pub async fn record_decision(
    pool: &DbPool,
    settings: &WorkflowSettings,
    ballot_id: &str,
    approved: bool,
) -> Result<QuorumOutcome, AppError> {
    let ballot = ballots::get_ballot(pool, ballot_id)
        .await?
        .ok_or_else(|| AppError::ballot_not_found(ballot_id))?;

    if !ballots::record_decision(pool, ballot_id, approved, db::now()).await? {
        log::info!(
            "[ledger] Ignoring repeat decision on ballot {} by {}",
            ballot_id,
            ballot.reviewer_id
        );
        return Err(AppError::AlreadyReviewed {
            ballot_id: ballot_id.to_string(),
        });
    }

    log::info!(
        "[ledger] {} {} event {}",
        ballot.reviewer_name,
        if approved { "approved" } else { "declined" },
        ballot.event_id
    );

    let event = events::get_event(pool, &ballot.event_id)
        .await?
        .ok_or_else(|| AppError::not_found_with_id("Event", &ballot.event_id))?;

    quorum::evaluate_quorum(pool, &event.id, &event.group_id, settings.quorum_threshold).await
}

/// Unreviewed ballots of a reviewer in a group, joined to their events.
///
/// An empty list is a normal answer, not an error.
pub async fn list_pending_ballots_for_reviewer(
    pool: &DbPool,
    group_id: &str,
    reviewer_id: &str,
) -> Result<Vec<PendingReview>, AppError> {
    let pending = ballots::list_pending_for_reviewer(pool, group_id, reviewer_id).await?;
    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{groups, members};
    use crate::models::Roster;
    use crate::services::nomination::{self, NominationInput};
    use tempfile::tempdir;

    async fn setup_test_db() -> DbPool {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        // Keep the dir alive by leaking it (for test purposes)
        std::mem::forget(dir);

        let pool = crate::db::initialize(&db_path).await.unwrap();

        members::upsert_member(&pool, "u1", "Alice", &["red", "blue"]).await.unwrap();
        let roster: Roster = [("u2", "Bob"), ("u3", "Cara")]
            .into_iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();
        groups::upsert_group(&pool, "red", &roster).await.unwrap();
        groups::upsert_group(&pool, "blue", &roster).await.unwrap();

        pool
    }

    async fn nominate(pool: &DbPool, group: &str) -> String {
        nomination::submit_nomination(
            pool,
            &WorkflowSettings::default(),
            NominationInput {
                nominee_name: "Alice".to_string(),
                group_id: group.to_string(),
                points: serde_json::json!(5),
                description: "on-call hero".to_string(),
            },
        )
        .await
        .unwrap()
        .event_id
    }

    async fn ballot_for(pool: &DbPool, event_id: &str, reviewer_id: &str) -> String {
        ballots::list_for_event(pool, event_id)
            .await
            .unwrap()
            .into_iter()
            .find(|b| b.reviewer_id == reviewer_id)
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_record_decision_triggers_quorum() {
        let pool = setup_test_db().await;
        let event_id = nominate(&pool, "red").await;
        let ballot_id = ballot_for(&pool, &event_id, "u2").await;

        let outcome = record_decision(&pool, &WorkflowSettings::default(), &ballot_id, true)
            .await
            .unwrap();
        assert_eq!(outcome.approval_percentage, 50.0);
        assert!(outcome.was_approved);

        let ballot = ballots::get_ballot(&pool, &ballot_id).await.unwrap().unwrap();
        assert!(ballot.reviewed && ballot.approved);
        assert!(ballot.reviewed_at.is_some());

        let event = events::get_event(&pool, &event_id).await.unwrap().unwrap();
        assert!(!event.is_pending());
    }

    #[tokio::test]
    async fn test_decline_is_recorded_without_approval() {
        let pool = setup_test_db().await;
        let event_id = nominate(&pool, "red").await;
        let ballot_id = ballot_for(&pool, &event_id, "u3").await;

        let outcome = record_decision(&pool, &WorkflowSettings::default(), &ballot_id, false)
            .await
            .unwrap();
        assert_eq!(outcome.approval_percentage, 0.0);
        assert!(!outcome.was_approved);

        let ballot = ballots::get_ballot(&pool, &ballot_id).await.unwrap().unwrap();
        assert!(ballot.reviewed);
        assert!(!ballot.approved);
    }

    #[tokio::test]
    async fn test_second_decision_is_rejected() {
        let pool = setup_test_db().await;
        let event_id = nominate(&pool, "red").await;
        let ballot_id = ballot_for(&pool, &event_id, "u2").await;
        let settings = WorkflowSettings::default();

        record_decision(&pool, &settings, &ballot_id, false).await.unwrap();
        let err = record_decision(&pool, &settings, &ballot_id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyReviewed { .. }));

        // The first verdict stands.
        let ballot = ballots::get_ballot(&pool, &ballot_id).await.unwrap().unwrap();
        assert!(!ballot.approved);
        let event = events::get_event(&pool, &event_id).await.unwrap().unwrap();
        assert!(event.is_pending());
    }

    #[tokio::test]
    async fn test_unknown_ballot() {
        let pool = setup_test_db().await;

        let err = record_decision(&pool, &WorkflowSettings::default(), "nope", true)
            .await
            .unwrap_err();
        assert!(matches!(&err, AppError::NotFound { resource, .. } if resource == "Ballot"));
    }

    #[tokio::test]
    async fn test_pending_ballots_filtered_by_group() {
        let pool = setup_test_db().await;
        let red_event = nominate(&pool, "red").await;
        let blue_event = nominate(&pool, "blue").await;

        let red = list_pending_ballots_for_reviewer(&pool, "red", "u2").await.unwrap();
        assert_eq!(red.len(), 1);
        assert_eq!(red[0].event.id, red_event);
        assert_eq!(red[0].ballot.reviewer_id, "u2");

        let blue = list_pending_ballots_for_reviewer(&pool, "blue", "u2").await.unwrap();
        assert_eq!(blue.len(), 1);
        assert_eq!(blue[0].event.id, blue_event);
    }

    #[tokio::test]
    async fn test_reviewed_ballots_leave_pending_list() {
        let pool = setup_test_db().await;
        let event_id = nominate(&pool, "red").await;
        let ballot_id = ballot_for(&pool, &event_id, "u3").await;

        record_decision(&pool, &WorkflowSettings::default(), &ballot_id, false)
            .await
            .unwrap();

        let pending = list_pending_ballots_for_reviewer(&pool, "red", "u3").await.unwrap();
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_ballot_without_event_is_dropped() {
        let pool = setup_test_db().await;
        let event_id = nominate(&pool, "red").await;

        sqlx::query(
            r#"INSERT INTO ballots (id, event_id, nominee_id, nominee_name, reviewer_id, reviewer_name, created_at)
            VALUES ('stray', 'vanished-event', 'u1', 'Alice', 'u2', 'Bob', 0)"#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let pending = list_pending_ballots_for_reviewer(&pool, "red", "u2").await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].event.id, event_id);
    }
}
