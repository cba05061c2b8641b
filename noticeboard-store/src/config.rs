//! Store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use noticeboard_core::constants::{
    DEFAULT_CAPACITY, DEFAULT_EVICTION_DELAY_MS, ENV_CAPACITY, ENV_EVICTION_DELAY_MS,
};
use noticeboard_core::error::{NoticeError, Result};

/// Store configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of notices kept; older ones are discarded on publish
    pub capacity: usize,
    /// Delay between dismissal and removal, in milliseconds
    pub eviction_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            eviction_delay_ms: DEFAULT_EVICTION_DELAY_MS,
        }
    }
}

impl StoreConfig {
    /// Reads overrides from `NOTICEBOARD_CAPACITY` and
    /// `NOTICEBOARD_EVICTION_DELAY_MS`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Parses a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_CAPACITY) {
            config.capacity = parse_var(ENV_CAPACITY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_EVICTION_DELAY_MS) {
            config.eviction_delay_ms = parse_var(ENV_EVICTION_DELAY_MS, &raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the eviction delay. Sub-millisecond precision is dropped.
    pub fn with_eviction_delay(mut self, delay: Duration) -> Self {
        self.eviction_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Eviction delay as a `Duration`.
    pub fn eviction_delay(&self) -> Duration {
        Duration::from_millis(self.eviction_delay_ms)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(NoticeError::InvalidConfig(
                "capacity must be at least 1".into(),
            ));
        }
        if self.eviction_delay_ms == 0 {
            return Err(NoticeError::InvalidConfig(
                "eviction delay must be at least 1ms".into(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| NoticeError::InvalidEnvVar {
        name: name.into(),
        value: raw.into(),
    })
}
