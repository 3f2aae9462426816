//! Configuration Module
//!
//! Handles loading cache and render-loop settings from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_TTL_MS;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in milliseconds for entries requested without an explicit TTL
    pub default_ttl_ms: u64,
    /// Render loop polling cadence in milliseconds
    pub poll_interval_ms: u64,
    /// Render loop deadline in milliseconds
    pub render_timeout_ms: u64,
    /// Simulated latency of the demo fetcher in milliseconds
    pub fetch_latency_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL_MS` - Default entry TTL (default: 60000)
    /// - `POLL_INTERVAL_MS` - Render loop polling cadence (default: 100)
    /// - `RENDER_TIMEOUT_MS` - Render loop deadline (default: 4000)
    /// - `FETCH_LATENCY_MS` - Demo fetcher latency (default: 1500)
    ///
    /// Missing, unparseable or zero values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl_ms: positive_ms("DEFAULT_TTL_MS", defaults.default_ttl_ms),
            poll_interval_ms: positive_ms("POLL_INTERVAL_MS", defaults.poll_interval_ms),
            render_timeout_ms: positive_ms("RENDER_TIMEOUT_MS", defaults.render_timeout_ms),
            fetch_latency_ms: positive_ms("FETCH_LATENCY_MS", defaults.fetch_latency_ms),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn fetch_latency(&self) -> Duration {
        Duration::from_millis(self.fetch_latency_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl_ms: DEFAULT_TTL_MS,
            poll_interval_ms: 100,
            render_timeout_ms: 4000,
            fetch_latency_ms: 1500,
        }
    }
}

fn positive_ms(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_ttl_ms, 60_000);
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.render_timeout_ms, 4000);
        assert_eq!(config.fetch_latency_ms, 1500);
        assert_eq!(config.default_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_positive_ms_fallbacks() {
        // Each case uses its own variable so parallel tests do not interfere
        env::remove_var("SUSPENSE_TEST_UNSET_MS");
        assert_eq!(positive_ms("SUSPENSE_TEST_UNSET_MS", 7), 7);

        env::set_var("SUSPENSE_TEST_ZERO_MS", "0");
        assert_eq!(positive_ms("SUSPENSE_TEST_ZERO_MS", 7), 7);

        env::set_var("SUSPENSE_TEST_BAD_MS", "soon");
        assert_eq!(positive_ms("SUSPENSE_TEST_BAD_MS", 7), 7);

        env::set_var("SUSPENSE_TEST_GOOD_MS", " 5000 ");
        assert_eq!(positive_ms("SUSPENSE_TEST_GOOD_MS", 7), 5000);
    }
}
