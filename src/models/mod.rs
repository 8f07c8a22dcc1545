//! Data models for the approval workflow.
//!
//! These models represent the entities stored in the SQLite record store and
//! returned over HTTP.
//!
//! Stored models derive Serialize for the HTTP layer and FromRow for SQLx queries.

pub mod ballot;
pub mod event;
pub mod group;
pub mod leaderboard;
pub mod member;

// Re-exports for convenient access
pub use ballot::{Ballot, PendingReview};
pub use event::{Event, EventStatus};
pub use group::{Group, Roster};
pub use leaderboard::LeaderboardEntry;
pub use member::Member;
