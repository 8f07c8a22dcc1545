//! Review ballot model.

use super::Event;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One reviewer's vote on one event.
///
/// `approved` is only meaningful once `reviewed` is set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Ballot {
    pub id: String,
    pub event_id: String,
    pub nominee_id: String,
    pub nominee_name: String,
    pub reviewer_id: String,
    pub reviewer_name: String,
    pub reviewed: bool,
    pub approved: bool,
    pub created_at: i64,
    pub reviewed_at: Option<i64>,
}

/// An unreviewed ballot joined to its event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingReview {
    pub ballot: Ballot,
    pub event: Event,
}
