//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs. Service definitions come
//! from the JSON config file (see `watchcat_common::config`); these settings
//! only tune the process itself.

use std::time::Duration;

/// Get an environment variable with fallback to a deprecated name
///
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Timeouts applied to the external calls a cat makes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Upper bound for a single active probe.
    pub probe_timeout: Duration,
    /// Upper bound for a single notification delivery.
    pub notify_timeout: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(10),
            notify_timeout: Duration::from_secs(10),
        }
    }
}

impl MonitorSettings {
    /// Load monitor settings from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let probe_secs = get_env_with_fallback_parse(
            "WATCHCAT_PROBE_TIMEOUT_SECS",
            "PROBE_TIMEOUT_SECS",
            defaults.probe_timeout.as_secs(),
        );
        let notify_secs = get_env_with_fallback_parse(
            "WATCHCAT_NOTIFY_TIMEOUT_SECS",
            "NOTIFY_TIMEOUT_SECS",
            defaults.notify_timeout.as_secs(),
        );
        Self {
            probe_timeout: Duration::from_secs(probe_secs.max(1)),
            notify_timeout: Duration::from_secs(notify_secs.max(1)),
        }
    }
}

/// HTTP server bind settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Listen port.
    pub port: u16,
}

impl ServerConfig {
    /// Load bind settings from `WATCHCAT_HOST` / `WATCHCAT_PORT` (`PORT` is still honored).
    pub fn from_env() -> Self {
        let host = std::env::var("WATCHCAT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = get_env_with_fallback_parse("WATCHCAT_PORT", "PORT", 80);
        Self { host, port }
    }

    /// Apply command line overrides.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
