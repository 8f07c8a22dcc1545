//! Repair job for events that own no ballots.
//!
//! Intake writes an event and its ballots together, but events imported or
//! written by other tools can still arrive without any. Such an event can
//! never reach quorum, so this job fans out ballots for it from the group's
//! current roster. Runs may overlap; reviewers that already hold a ballot
//! are skipped.

use crate::config::WorkflowSettings;
use crate::db::pool::DbPool;
use crate::db::{self, ballots, events};
use crate::error::AppError;
use crate::models::Event;
use crate::services::{directory, nomination};
use serde::{Deserialize, Serialize};

/// One event that received ballots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairedEvent {
    pub event_id: String,
    pub ballots_created: usize,
}

/// Events that currently own no ballots.
pub async fn find_orphaned_events(pool: &DbPool) -> Result<Vec<Event>, AppError> {
    Ok(events::list_without_ballots(pool).await?)
}

/// Fan out ballots for every orphaned event.
///
/// Events whose group has no usable roster, or no reviewer left after the
/// self-review filter, are skipped and retried on the next run.
pub async fn repair_orphaned_events(
    pool: &DbPool,
    settings: &WorkflowSettings,
) -> Result<Vec<RepairedEvent>, AppError> {
    let orphans = find_orphaned_events(pool).await?;
    let mut repaired = Vec::new();

    for event in orphans {
        let roster = match directory::get_roster(pool, &event.group_id).await {
            Ok(roster) => roster,
            Err(e) if e.is_not_found() => {
                log::warn!(
                    "[reconciliation] Skipping event {}: roster for {} unavailable",
                    event.id,
                    event.group_id
                );
                continue;
            }
            Err(e) => return Err(e),
        };

        let new_ballots = nomination::fan_out_ballots(&event, &roster, settings, db::now());
        if new_ballots.is_empty() {
            log::warn!(
                "[reconciliation] Skipping event {}: no eligible reviewers in {}",
                event.id,
                event.group_id
            );
            continue;
        }

        // A concurrent run may have repaired the event since it was listed.
        let mut tx = pool.begin().await?;
        let inserted = ballots::insert_missing_ballots(&mut *tx, &new_ballots).await?;
        tx.commit().await?;

        if inserted == 0 {
            log::debug!("[reconciliation] Event {} already repaired", event.id);
            continue;
        }

        log::info!(
            "[reconciliation] Created {} ballots for orphaned event {}",
            inserted,
            event.id
        );
        repaired.push(RepairedEvent {
            event_id: event.id,
            ballots_created: inserted as usize,
        });
    }

    Ok(repaired)
}
