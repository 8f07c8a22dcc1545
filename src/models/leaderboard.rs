//! Leaderboard entry model.

use serde::{Deserialize, Serialize};

/// Total approved points for one nominee display name.
///
/// Events carry `i64` points; the total is widened so any number of them
/// sums without overflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub total: i128,
}
