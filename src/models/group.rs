//! Group model with its reviewer roster.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

/// Reviewer roster: reviewer id → reviewer display name.
pub type Roster = BTreeMap<String, String>;

/// A recognition group.
///
/// Note: `people` is the roster stored as a JSON object string in SQLite.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    /// Group identity.
    pub id: String,

    /// JSON object of reviewer id → reviewer name.
    pub people: String,
}

impl Group {
    /// Parse the people map. Malformed JSON yields `None`.
    pub fn roster(&self) -> Option<Roster> {
        serde_json::from_str(&self.people).ok()
    }
}
