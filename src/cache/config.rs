//! Cache configuration.
//!
//! Controls idle expiry and background sweeping via `sdmx-convert.toml`.

use std::time::Duration;

use serde::Deserialize;

use super::error::CacheError;

// Default values for cache configuration
const DEFAULT_IDLE_EXPIRY_MS: u64 = 30 * 60 * 1000;
const DEFAULT_SWEEP_INTERVAL_MS: u64 = 5 * 60 * 1000;

/// Cache configuration from `sdmx-convert.toml`.
///
/// One configuration applies to every cache a registry creates; there is no
/// per-cache override. A registry with a different policy is constructed
/// from its own `CacheConfig`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Idle window (ms) after which an untouched entry expires.
    pub idle_expiry_ms: u64,
    /// Interval (ms) between background sweeps of expired entries.
    pub sweep_interval_ms: u64,
    /// Spawn the background sweeper task.
    pub enable_sweeper: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            idle_expiry_ms: DEFAULT_IDLE_EXPIRY_MS,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
            enable_sweeper: true,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            idle_expiry_ms: settings.idle_expiry_ms,
            sweep_interval_ms: settings.sweep_interval_ms,
            enable_sweeper: settings.enable_sweeper,
        }
    }
}

impl CacheConfig {
    /// Reject values a registry cannot operate with.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.idle_expiry_ms == 0 {
            return Err(CacheError::configuration(
                "cache.idle_expiry_ms",
                "must be greater than zero",
            ));
        }
        if self.sweep_interval_ms == 0 {
            return Err(CacheError::configuration(
                "cache.sweep_interval_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Idle window as a [`Duration`].
    pub fn idle_expiry(&self) -> Duration {
        Duration::from_millis(self.idle_expiry_ms)
    }

    /// Sweep interval as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}
