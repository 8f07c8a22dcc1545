//! Nomination intake.
//!
//! Validates a nomination against the directory, creates the pending event
//! and fans out one ballot per roster entry of the nominating group.

use crate::config::WorkflowSettings;
use crate::db::pool::DbPool;
use crate::db::{self, ballots, events};
use crate::error::AppError;
use crate::models::{Ballot, Event, Member, Roster};
use crate::services::directory;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A nomination as submitted by a caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationInput {
    /// Display name of the member being nominated.
    pub nominee_name: String,
    /// Group the nomination is filed in.
    pub group_id: String,
    /// Point value; a JSON number or numeric string.
    pub points: Value,
    #[serde(default)]
    pub description: String,
}

/// Result of a successful nomination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationReceipt {
    pub event_id: String,
    pub ballots_created: usize,
}

/// Coerce a submitted point value to an integer.
///
/// Accepts integers, floats (truncated toward zero) and strings holding
/// either. Anything else is `InvalidPoints`.
pub fn coerce_points(raw: &Value) -> Result<i64, AppError> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(truncate_float))
            .ok_or_else(|| AppError::invalid_points(raw)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate_float))
                .ok_or_else(|| AppError::invalid_points(raw))
        }
        _ => Err(AppError::invalid_points(raw)),
    }
}

fn truncate_float(f: f64) -> Option<i64> {
    let t = f.trunc();
    (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
}

/// Build the pending ballots for an event, one per roster entry.
pub fn fan_out_ballots(
    event: &Event,
    roster: &Roster,
    settings: &WorkflowSettings,
    created_at: i64,
) -> Vec<Ballot> {
    roster
        .iter()
        .filter(|(reviewer_id, _)| {
            !(settings.exclude_self_review && **reviewer_id == event.nominee_id)
        })
        .map(|(reviewer_id, reviewer_name)| Ballot {
            id: Uuid::new_v4().to_string(),
            event_id: event.id.clone(),
            nominee_id: event.nominee_id.clone(),
            nominee_name: event.nominee_name.clone(),
            reviewer_id: reviewer_id.clone(),
            reviewer_name: reviewer_name.clone(),
            reviewed: false,
            approved: false,
            created_at,
            reviewed_at: None,
        })
        .collect()
}

/// Submit a nomination.
///
/// The event and its ballots are committed in one transaction, so a failure
/// at any step leaves no event behind.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `settings` - Workflow settings (self-review policy)
/// * `input` - The nomination
///
/// # Returns
/// The new event ID and the number of ballots fanned out
pub async fn submit_nomination(
    pool: &DbPool,
    settings: &WorkflowSettings,
    input: NominationInput,
) -> Result<NominationReceipt, AppError> {
    let nominee = directory::resolve_member(pool, &input.nominee_name).await?;
    ensure_group_member(&nominee, &input.group_id)?;

    let points = coerce_points(&input.points)?;
    let roster = directory::get_roster(pool, &input.group_id).await?;

    let created_at = db::now();
    let event = Event {
        id: Uuid::new_v4().to_string(),
        nominee_id: nominee.id,
        nominee_name: nominee.name,
        group_id: input.group_id,
        points,
        description: input.description,
        approved: false,
        created_at,
        approved_at: None,
    };
    let new_ballots = fan_out_ballots(&event, &roster, settings, created_at);
    if new_ballots.is_empty() {
        // Nobody could ever vote on it.
        log::warn!(
            "[nomination] Rejected: no reviewers for {} in {}",
            event.nominee_name,
            event.group_id
        );
        return Err(AppError::roster_unavailable(&event.group_id));
    }

    let mut tx = pool.begin().await?;
    events::insert_event(&mut *tx, &event)
        .await
        .map_err(|e| AppError::database_with_op(e.to_string(), "insert event"))?;
    ballots::insert_ballots(&mut *tx, &new_ballots)
        .await
        .map_err(|e| AppError::database_with_op(e.to_string(), "insert ballots"))?;
    tx.commit().await?;

    log::info!(
        "[nomination] Event {} for {} in {} ({} points, {} ballots)",
        event.id,
        event.nominee_name,
        event.group_id,
        event.points,
        new_ballots.len()
    );

    Ok(NominationReceipt {
        event_id: event.id,
        ballots_created: new_ballots.len(),
    })
}

fn ensure_group_member(nominee: &Member, group_id: &str) -> Result<(), AppError> {
    if directory::is_member_of_group(nominee, group_id) {
        return Ok(());
    }

    log::info!(
        "[nomination] Rejected: {} is not in group {}",
        nominee.name,
        group_id
    );
    Err(AppError::NotAGroupMember {
        submitted_group: group_id.to_string(),
        member_groups: nominee.groups_vec(),
    })
}
