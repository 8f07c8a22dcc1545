//! Peer Points - peer-approval workflow for group recognition points.
//!
//! A member nominates a colleague for points, every roster member of the
//! group receives a ballot, and the nomination is finalized once enough
//! reviewers approve it. Approved points feed a per-group leaderboard.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

use config::Config;
use error::AppError;
use services::{reconciliation, server, AppState};

/// Open the database, optionally repair orphaned events, and serve the API
/// until Ctrl-C.
pub async fn run(config: Config) -> Result<(), AppError> {
    let settings = config.workflow();
    settings.validate()?;

    let pool = db::initialize(&config.database_path).await?;
    log::info!(
        "[startup] Database ready at {}",
        config.database_path.display()
    );

    if config.repair_on_startup {
        let repaired = reconciliation::repair_orphaned_events(&pool, &settings).await?;
        log::info!("[startup] Repaired {} orphaned events", repaired.len());
    }

    let handle = server::start_server(config.bind, AppState { db: pool.clone(), settings }).await?;

    let cancel = handle.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("[startup] Shutdown signal received");
            cancel.cancel();
        }
    });

    handle.wait().await;
    pool.close().await;
    Ok(())
}
