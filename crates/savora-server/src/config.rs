//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use savora_shared::constants::{DEFAULT_HTTP_PORT, TRIAL_WINDOW_HOURS};
use savora_shared::overrides::PlanOverrides;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Filesystem path of the SQLite database.
    /// Env: `DATABASE_PATH`
    /// Default: unset (platform data directory).
    pub database_path: Option<PathBuf>,

    /// Length of the free-trial window granted at provisioning, in hours.
    /// Env: `TRIAL_HOURS`
    /// Default: `24`
    pub trial_hours: i64,

    /// Email of the support-staff profile that receives member messages.
    /// Env: `ADMIN_EMAIL`
    /// Default: unset (member messages raise no notification).
    pub admin_email: Option<String>,

    /// Accounts pinned to a plan, e.g. `a@x.com=premium,b@x.com=essential`.
    /// Env: `PLAN_OVERRIDES`
    /// Default: empty.
    pub plan_overrides: PlanOverrides,

    /// Whether new profiles can be provisioned.
    /// Env: `REGISTRATION_OPEN` (true/false)
    /// Default: `true`
    pub registration_open: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: None,
            trial_hours: TRIAL_WINDOW_HOURS,
            admin_email: None,
            plan_overrides: PlanOverrides::default(),
            registration_open: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(
                    value = %addr,
                    "Invalid HTTP_ADDR, using default"
                );
            }
        }

        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Ok(val) = std::env::var("TRIAL_HOURS") {
            match val.parse::<i64>() {
                Ok(hours) if hours > 0 => config.trial_hours = hours,
                _ => {
                    tracing::warn!(value = %val, "Invalid TRIAL_HOURS, using default");
                }
            }
        }

        if let Ok(email) = std::env::var("ADMIN_EMAIL") {
            if !email.is_empty() {
                config.admin_email = Some(email);
            }
        }

        if let Ok(raw) = std::env::var("PLAN_OVERRIDES") {
            match raw.parse::<PlanOverrides>() {
                Ok(overrides) => config.plan_overrides = overrides,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Invalid PLAN_OVERRIDES, ignoring the setting"
                    );
                }
            }
        }

        if let Ok(val) = std::env::var("REGISTRATION_OPEN") {
            config.registration_open = val != "false" && val != "0";
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.trial_hours, 24);
        assert!(config.plan_overrides.is_empty());
        assert!(config.registration_open);
    }
}
