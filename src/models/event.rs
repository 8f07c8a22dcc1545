//! Nomination event model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Approval status of an event.
///
/// There is no rejected state: an event that never reaches quorum stays
/// pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Approved,
}

impl From<bool> for EventStatus {
    fn from(approved: bool) -> Self {
        if approved {
            Self::Approved
        } else {
            Self::Pending
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
        }
    }
}

/// A nomination awaiting (or having received) peer approval.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event ID (UUID, generated on creation).
    pub id: String,

    /// Nominee identity.
    pub nominee_id: String,

    /// Nominee display name.
    pub nominee_name: String,

    /// Nominating group.
    pub group_id: String,

    /// Point value, may be negative.
    pub points: i64,

    /// Free-text description.
    pub description: String,

    /// Whether the event reached quorum.
    pub approved: bool,

    /// Creation timestamp (Unix).
    pub created_at: i64,

    /// When quorum was reached (Unix).
    pub approved_at: Option<i64>,
}

impl Event {
    /// Status as an enum.
    pub fn status(&self) -> EventStatus {
        EventStatus::from(self.approved)
    }

    /// Check if the event is still waiting for quorum.
    pub fn is_pending(&self) -> bool {
        self.status() == EventStatus::Pending
    }
}
