//! Configuration snapshot loaded once at startup.
//!
//! Both binaries read the environment (after `dotenv`) into an immutable
//! `SyncConfig` and pass it down explicitly; nothing re-reads the environment
//! mid-request or mid-tick.

use crate::registry::Metric;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/health/v1";
pub const DEFAULT_POLL_MINUTES: u64 = 60;

/// The set of metrics the user has switched on. Gates both dispatch and
/// structural maintenance of the variable tree.
#[derive(Debug, Clone, Default)]
pub struct EnableFlags(HashSet<Metric>);

impl EnableFlags {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self(Metric::ALL.into_iter().collect())
    }

    pub fn with(mut self, metric: Metric) -> Self {
        self.0.insert(metric);
        self
    }

    pub fn is_enabled(&self, metric: Metric) -> bool {
        self.0.contains(&metric)
    }

    /// Enabled metrics in registry order, so polling is deterministic.
    pub fn enabled(&self) -> impl Iterator<Item = Metric> + '_ {
        Metric::ALL.into_iter().filter(|m| self.0.contains(m))
    }

    /// Reads `ENABLE_<KEY>` for every metric, e.g. `ENABLE_HEART_RATE=true`.
    /// Unset flags default to off.
    pub fn from_env() -> Self {
        let mut flags = Self::none();
        for metric in Metric::ALL {
            let var = format!("ENABLE_{}", metric.key().to_ascii_uppercase());
            if read_bool_env(&var) {
                flags.0.insert(metric);
            }
        }
        flags
    }
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub flags: EnableFlags,
    /// Bearer credential for the cloud health API. Empty when only the
    /// webhook path is in use.
    pub token: String,
    pub poll_interval: Duration,
    pub api_base: String,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self> {
        let minutes = match std::env::var("HEALTH_POLL_INTERVAL_MIN") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .context("HEALTH_POLL_INTERVAL_MIN must be a whole number of minutes")?,
            Err(_) => DEFAULT_POLL_MINUTES,
        };

        Ok(Self {
            flags: EnableFlags::from_env(),
            token: std::env::var("HEALTH_TOKEN").unwrap_or_default(),
            poll_interval: Duration::from_secs(minutes * 60),
            api_base: std::env::var("HEALTH_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        })
    }
}

fn read_bool_env(name: &str) -> bool {
    match std::env::var(name) {
        Ok(raw) => matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_to_off() {
        let flags = EnableFlags::none();
        assert!(!flags.is_enabled(Metric::Steps));
        assert_eq!(flags.enabled().count(), 0);
    }

    #[test]
    fn enabled_iterates_in_registry_order() {
        let flags = EnableFlags::none()
            .with(Metric::SleepSession)
            .with(Metric::Steps)
            .with(Metric::Weight);
        let order: Vec<Metric> = flags.enabled().collect();
        assert_eq!(
            order,
            vec![Metric::Steps, Metric::Weight, Metric::SleepSession]
        );
    }

    #[test]
    fn all_covers_every_metric() {
        let flags = EnableFlags::all();
        for metric in Metric::ALL {
            assert!(flags.is_enabled(metric));
        }
    }
}
