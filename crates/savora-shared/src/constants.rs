/// Application name
pub const APP_NAME: &str = "Savora";

/// Free-trial window granted once at first login, in hours
pub const TRIAL_WINDOW_HOURS: i64 = 24;

/// Distinct video lessons an Essential subscriber may open per calendar month
pub const ESSENTIAL_MONTHLY_VIDEO_LIMIT: usize = 5;

/// Recent activity rows returned with a user payload
pub const ACTIVITY_HISTORY_LIMIT: u32 = 20;

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8080;
