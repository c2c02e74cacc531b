//! Configuration Module
//!
//! Handles loading cache, scheduling and server settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Operator cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Durations are expressed in seconds.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL for organically populated entries
    pub default_ttl: u64,
    /// TTL for entries written by the preloader
    pub preload_ttl: u64,
    /// TTL for list queries recognized as common
    pub common_query_ttl: u64,
    /// Entity entries closer than this to expiry are renewed on read
    pub renewal_window: u64,
    /// Janitor sweep interval
    pub cleanup_interval: u64,
    /// Preload interval
    pub preload_interval: u64,
    /// Stats log interval
    pub stats_log_interval: u64,
    /// Number of recently active operators to preload
    pub preload_operator_count: usize,
    /// Number of preloaded operators whose first activity page is also preloaded
    pub preload_activity_count: usize,
    /// Admin HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_CACHE_SIZE` - Maximum cache entries (default: 5000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 1800)
    /// - `PRELOAD_TTL` - Preload TTL in seconds (default: 7200)
    /// - `COMMON_QUERY_TTL` - Common list query TTL in seconds (default: 3600)
    /// - `RENEWAL_WINDOW` - Near-expiry renewal window in seconds (default: 300)
    /// - `CLEANUP_INTERVAL` - Janitor frequency in seconds (default: 300)
    /// - `PRELOAD_INTERVAL` - Preload frequency in seconds (default: 1800)
    /// - `STATS_LOG_INTERVAL` - Stats log frequency in seconds (default: 900)
    /// - `PRELOAD_OPERATOR_COUNT` - Hot operators to preload (default: 50)
    /// - `PRELOAD_ACTIVITY_COUNT` - Activity pages to preload (default: 10)
    /// - `SERVER_PORT` - Admin HTTP server port (default: 3000)
    ///
    /// Missing, unparsable or zero values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: positive_var("MAX_CACHE_SIZE").unwrap_or(defaults.max_entries),
            default_ttl: positive_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            preload_ttl: positive_var("PRELOAD_TTL").unwrap_or(defaults.preload_ttl),
            common_query_ttl: positive_var("COMMON_QUERY_TTL")
                .unwrap_or(defaults.common_query_ttl),
            renewal_window: positive_var("RENEWAL_WINDOW").unwrap_or(defaults.renewal_window),
            cleanup_interval: positive_var("CLEANUP_INTERVAL")
                .unwrap_or(defaults.cleanup_interval),
            preload_interval: positive_var("PRELOAD_INTERVAL")
                .unwrap_or(defaults.preload_interval),
            stats_log_interval: positive_var("STATS_LOG_INTERVAL")
                .unwrap_or(defaults.stats_log_interval),
            preload_operator_count: positive_var("PRELOAD_OPERATOR_COUNT")
                .unwrap_or(defaults.preload_operator_count),
            preload_activity_count: positive_var("PRELOAD_ACTIVITY_COUNT")
                .unwrap_or(defaults.preload_activity_count),
            server_port: positive_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn preload_ttl(&self) -> Duration {
        Duration::from_secs(self.preload_ttl)
    }

    pub fn common_query_ttl(&self) -> Duration {
        Duration::from_secs(self.common_query_ttl)
    }

    pub fn renewal_window(&self) -> Duration {
        Duration::from_secs(self.renewal_window)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }

    pub fn preload_interval(&self) -> Duration {
        Duration::from_secs(self.preload_interval)
    }

    pub fn stats_log_interval(&self) -> Duration {
        Duration::from_secs(self.stats_log_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 5000,
            default_ttl: 30 * 60,
            preload_ttl: 2 * 60 * 60,
            common_query_ttl: 60 * 60,
            renewal_window: 5 * 60,
            cleanup_interval: 5 * 60,
            preload_interval: 30 * 60,
            stats_log_interval: 15 * 60,
            preload_operator_count: 50,
            preload_activity_count: 10,
            server_port: 3000,
        }
    }
}

/// Reads and parses an environment variable, discarding zero values.
fn positive_var<T>(name: &str) -> Option<T>
where
    T: FromStr + PartialEq + Default,
{
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v != T::default())
}
