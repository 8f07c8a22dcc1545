//! Workflow services.
//!
//! Each service owns one step of the nomination lifecycle and talks to the
//! database through `crate::db`. The HTTP layer in `api` is a thin adapter
//! over them.

pub mod api;
pub mod directory;
pub mod leaderboard;
pub mod ledger;
pub mod nomination;
pub mod quorum;
pub mod reconciliation;
pub mod server;

pub use quorum::QuorumOutcome;
pub use server::{AppState, ServerHandle};
