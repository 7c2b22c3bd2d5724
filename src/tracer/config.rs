//! Tracer configuration.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Environment variables read by [`TracerConfig::from_env`]
pub const ENV_METADATA_ONLY: &str = "MQTT_TRACER_METADATA_ONLY";
pub const ENV_MAX_PENDING: &str = "MQTT_TRACER_MAX_PENDING";
pub const ENV_MAX_EVENTS: &str = "MQTT_TRACER_MAX_EVENTS";
pub const ENV_SETTLE_TIMEOUT_MS: &str = "MQTT_TRACER_SETTLE_TIMEOUT_MS";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Options for the tracer registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracerConfig {
    /// Leave message content out of event payloads (default: false)
    pub metadata_only: bool,
    /// Maximum number of in-flight events awaiting completion (default: 1000)
    pub max_pending: usize,
    /// Maximum number of finalized events buffered before the oldest is
    /// evicted (default: 10000)
    pub max_events: usize,
    /// How long `settle` waits for an outstanding call (default: 5s)
    pub settle_timeout: Duration,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            metadata_only: false,
            max_pending: 1000,
            max_events: 10_000,
            settle_timeout: Duration::from_secs(5),
        }
    }
}

impl TracerConfig {
    /// Build a config from `MQTT_TRACER_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_METADATA_ONLY) {
            config.metadata_only = parse_bool(ENV_METADATA_ONLY, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_PENDING) {
            config.max_pending = parse_number(ENV_MAX_PENDING, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_EVENTS) {
            config.max_events = parse_number(ENV_MAX_EVENTS, &value)?;
        }
        if let Some(value) = lookup(ENV_SETTLE_TIMEOUT_MS) {
            let millis: u64 = parse_number(ENV_SETTLE_TIMEOUT_MS, &value)?;
            config.settle_timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}
