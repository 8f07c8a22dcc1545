//! Server configuration.
//!
//! Values come from command-line flags or `PEER_POINTS_*` environment
//! variables; a `.env` file is loaded first when present.

use crate::error::AppError;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default quorum threshold, in percent of the roster.
pub const DEFAULT_QUORUM_THRESHOLD: f64 = 50.0;

/// Default number of leaderboard entries returned.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 5;

/// Command-line / environment configuration for the server binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "peer-points", version, about = "Peer-approval workflow server")]
pub struct Config {
    /// Path to the SQLite database file.
    #[arg(long = "database", env = "PEER_POINTS_DB", default_value = "peer-points.db")]
    pub database_path: PathBuf,

    /// Address the HTTP server binds to.
    #[arg(long, env = "PEER_POINTS_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Approval percentage at which a nomination is finalized.
    #[arg(long, env = "PEER_POINTS_QUORUM_THRESHOLD", default_value_t = DEFAULT_QUORUM_THRESHOLD)]
    pub quorum_threshold: f64,

    /// Maximum number of leaderboard entries.
    #[arg(long, env = "PEER_POINTS_LEADERBOARD_LIMIT", default_value_t = DEFAULT_LEADERBOARD_LIMIT)]
    pub leaderboard_limit: usize,

    /// Do not hand the nominee a ballot on their own nomination.
    #[arg(long, env = "PEER_POINTS_EXCLUDE_SELF_REVIEW")]
    pub exclude_self_review: bool,

    /// Fan out ballots for events that have none before serving.
    #[arg(long, env = "PEER_POINTS_REPAIR_ON_STARTUP")]
    pub repair_on_startup: bool,
}

impl Config {
    /// Load configuration from the process arguments and environment.
    pub fn load() -> Result<Self, AppError> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        let config = Self::parse();
        config.workflow().validate()?;
        Ok(config)
    }

    /// Workflow settings derived from this configuration.
    pub fn workflow(&self) -> WorkflowSettings {
        WorkflowSettings {
            quorum_threshold: self.quorum_threshold,
            leaderboard_limit: self.leaderboard_limit,
            exclude_self_review: self.exclude_self_review,
        }
    }
}

/// Tunables consumed by the workflow services.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkflowSettings {
    /// Approval percentage (0, 100] at which an event is finalized.
    pub quorum_threshold: f64,
    /// Maximum leaderboard entries.
    pub leaderboard_limit: usize,
    /// Skip the nominee's own roster entry when fanning out ballots.
    pub exclude_self_review: bool,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            quorum_threshold: DEFAULT_QUORUM_THRESHOLD,
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
            exclude_self_review: false,
        }
    }
}

impl WorkflowSettings {
    /// Reject settings the workflow cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.quorum_threshold > 0.0 && self.quorum_threshold <= 100.0) {
            return Err(AppError::invalid_input_field(
                format!(
                    "quorum threshold must be in (0, 100], got {}",
                    self.quorum_threshold
                ),
                "quorum_threshold",
            ));
        }
        if self.leaderboard_limit == 0 {
            return Err(AppError::invalid_input_field(
                "leaderboard limit must be at least 1",
                "leaderboard_limit",
            ));
        }
        Ok(())
    }
}
