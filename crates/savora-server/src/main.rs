//! # savora-server
//!
//! Hosted backend for the Savora subscription content service.
//!
//! This binary provides:
//! - **REST API** (axum) for accounts, catalog, favorites, notifications,
//!   support chat, and the admin panel
//! - **Entitlement decisions** (trial expiry, plan gating, monthly video
//!   quota) via the pure engine in `savora-shared`
//! - **Engagement tracking**: daily streaks and an append-only activity log
//! - **SQLite persistence** through `savora-store`

mod access;
mod api;
mod config;
mod error;
mod recorder;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use savora_store::Database;

use crate::access::AccessPolicy;
use crate::api::AppState;
use crate::config::ServerConfig;
use crate::recorder::Recorder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,savora_server=debug")),
        )
        .init();

    info!("Starting Savora server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(
        registration_open = config.registration_open,
        trial_hours = config.trial_hours,
        plan_overrides = config.plan_overrides.len(),
        support_configured = config.admin_email.is_some(),
        "Loaded configuration"
    );

    // -----------------------------------------------------------------------
    // 3. Open storage
    // -----------------------------------------------------------------------
    let database = match &config.database_path {
        Some(path) => Database::open_at(path)?,
        None => Database::open_default()?,
    };
    let db = Arc::new(Mutex::new(database));

    // -----------------------------------------------------------------------
    // 4. Initialize services
    // -----------------------------------------------------------------------
    let policy = AccessPolicy::new(
        db.clone(),
        config.plan_overrides.clone(),
        config.trial_hours,
    );
    let recorder = Recorder::new(db.clone());

    let http_addr = config.http_addr;
    let app_state = AppState {
        db,
        policy,
        recorder,
        config: Arc::new(config),
    };

    // -----------------------------------------------------------------------
    // 5. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    // tokio::select! ensures that if either the HTTP server or a shutdown
    // signal arrives, we exit cleanly.
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
