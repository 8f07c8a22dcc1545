//! Quorum evaluation.
//!
//! Recomputes an event's approval ratio from scratch: the roster is re-read
//! and the approving ballots recounted on every call. No running counter is
//! kept, so concurrent decisions, roster changes and ballots imported out of
//! band all converge on the next evaluation.

use crate::db::pool::DbPool;
use crate::db::{self, ballots, events};
use crate::error::AppError;
use crate::services::directory;
use serde::{Deserialize, Serialize};

/// Outcome of one quorum evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuorumOutcome {
    /// Approving ballots as a percentage of the current roster size.
    pub approval_percentage: f64,
    /// Whether this evaluation meets the threshold, regardless of whether
    /// the event had already been approved earlier.
    pub was_approved: bool,
}

/// Approval percentage for `approved` votes out of `total` roster members.
pub fn approval_percentage(approved: i64, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    approved as f64 / total as f64 * 100.0
}

/// Evaluate quorum for an event and finalize it when the threshold is met.
///
/// Finalizing an already-approved event is a no-op. An event never moves
/// back to pending, whatever the current count.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `event_id` - Event to evaluate
/// * `group_id` - Group whose roster is the denominator
/// * `threshold` - Approval percentage required
pub async fn evaluate_quorum(
    pool: &DbPool,
    event_id: &str,
    group_id: &str,
    threshold: f64,
) -> Result<QuorumOutcome, AppError> {
    let roster = directory::get_roster(pool, group_id).await?;
    let approved = ballots::count_approved(pool, event_id).await?;

    let percentage = approval_percentage(approved, roster.len());
    let meets_threshold = percentage >= threshold;

    let event = events::get_event(pool, event_id)
        .await?
        .ok_or_else(|| AppError::not_found_with_id("Event", event_id))?;

    log::debug!(
        "[quorum] Event {} ({}): {}/{} approvals ({:.1}%)",
        event_id,
        event.status(),
        approved,
        roster.len(),
        percentage
    );

    if meets_threshold
        && event.is_pending()
        && events::mark_approved(pool, event_id, db::now()).await?
    {
        log::info!(
            "[quorum] Event {} approved at {:.1}% ({} points to {})",
            event_id,
            percentage,
            event.points,
            event.nominee_name
        );
    }

    Ok(QuorumOutcome {
        approval_percentage: percentage,
        was_approved: meets_threshold,
    })
}
