//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    /// SQLite database holding operator drafts.
    pub database_url: String,
    pub templates_dir: String,
    /// Cookie and identity signing key; at least 64 bytes.
    pub secret: String,
    /// Base URL of the QC backend, e.g. `http://localhost:8080/api/v1`.
    pub backend_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How long after a task window closes entry is still allowed.
    #[serde(default = "default_grace_period_minutes")]
    pub grace_period_minutes: i64,
    /// Auto-refresh interval of the approval queue.
    #[serde(default = "default_approval_refresh_secs")]
    pub approval_refresh_secs: u64,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn grace_period(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.grace_period_minutes.max(0))
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_grace_period_minutes() -> i64 {
    30
}

fn default_approval_refresh_secs() -> u64 {
    30
}

fn default_search_debounce_ms() -> u64 {
    500
}
