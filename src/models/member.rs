//! Directory member model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A member of the directory.
///
/// Note: `memberships` is stored as text in SQLite. It is usually a JSON
/// array of group ids, but older records hold a single bare group id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Opaque member identity.
    pub id: String,

    /// Display name, used to address nominations.
    pub name: String,

    /// Raw membership field.
    pub memberships: String,
}

impl Member {
    /// Parse the membership field into a set of group ids.
    ///
    /// A single-valued field (bare id or JSON string) is a one-element set.
    pub fn groups_vec(&self) -> Vec<String> {
        parse_memberships(&self.memberships)
    }

    /// Check whether this member belongs to `group_id`.
    pub fn is_member_of(&self, group_id: &str) -> bool {
        self.groups_vec().iter().any(|g| g == group_id)
    }

    /// The group a member lands in by default: the first listed membership.
    pub fn default_group(&self) -> Option<String> {
        self.groups_vec().into_iter().next()
    }
}

fn parse_memberships(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Ok(serde_json::Value::String(s)) => vec![s],
        Ok(serde_json::Value::Null) => Vec::new(),
        Ok(other) => vec![other.to_string()],
        Err(_) => vec![trimmed.to_string()],
    }
}
