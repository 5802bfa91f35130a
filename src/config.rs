//! Configuration loading and management

use anyhow::{bail, Context, Result};

use crate::listener::ListenerOptions;

const ENV_LOG: &str = "ESC_LISTENER_LOG";
const ENV_CHANNEL_CAPACITY: &str = "ESC_LISTENER_CHANNEL_CAPACITY";
const ENV_IGNORE_AUTOREPEAT: &str = "ESC_LISTENER_IGNORE_AUTOREPEAT";
const ENV_ECHO: &str = "ESC_LISTENER_ECHO";

/// Listener configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: String,

    /// Capacity of the listener -> manager channel
    pub channel_capacity: usize,

    /// Drop auto-repeated KeyDown events at the tap
    pub ignore_autorepeat: bool,

    /// Print every tracked key event to stdout as a JSON line
    pub echo_events: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            channel_capacity: 32,
            ignore_autorepeat: true,
            echo_events: false,
        }
    }
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup(ENV_LOG) {
            let filter = filter.trim();
            if !filter.is_empty() {
                config.log_filter = filter.to_string();
            }
        }

        if let Some(raw) = lookup(ENV_CHANNEL_CAPACITY) {
            let capacity: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a positive integer", ENV_CHANNEL_CAPACITY))?;
            if capacity == 0 {
                bail!("{} must be greater than zero", ENV_CHANNEL_CAPACITY);
            }
            config.channel_capacity = capacity;
        }

        if let Some(raw) = lookup(ENV_IGNORE_AUTOREPEAT) {
            config.ignore_autorepeat = parse_bool(&raw)
                .with_context(|| format!("invalid value for {}", ENV_IGNORE_AUTOREPEAT))?;
        }

        if let Some(raw) = lookup(ENV_ECHO) {
            config.echo_events =
                parse_bool(&raw).with_context(|| format!("invalid value for {}", ENV_ECHO))?;
        }

        Ok(config)
    }

    pub fn listener_options(&self) -> ListenerOptions {
        ListenerOptions {
            ignore_autorepeat: self.ignore_autorepeat,
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.channel_capacity, 32);
        assert!(config.ignore_autorepeat);
        assert!(!config.echo_events);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_LOG, "escape_key_listener=debug"),
            (ENV_CHANNEL_CAPACITY, " 128 "),
            (ENV_IGNORE_AUTOREPEAT, "off"),
            (ENV_ECHO, "YES"),
        ]))
        .unwrap();

        assert_eq!(config.log_filter, "escape_key_listener=debug");
        assert_eq!(config.channel_capacity, 128);
        assert!(!config.ignore_autorepeat);
        assert!(config.echo_events);
        assert!(!config.listener_options().ignore_autorepeat);
    }

    #[test]
    fn test_blank_log_filter_keeps_default() {
        let config = Config::from_lookup(lookup_from(&[(ENV_LOG, "  ")])).unwrap();
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = Config::from_lookup(lookup_from(&[(ENV_CHANNEL_CAPACITY, "0")])).unwrap_err();
        assert!(err.to_string().contains(ENV_CHANNEL_CAPACITY));
    }

    #[test]
    fn test_non_numeric_capacity_rejected() {
        assert!(Config::from_lookup(lookup_from(&[(ENV_CHANNEL_CAPACITY, "lots")])).is_err());
    }

    #[test]
    fn test_invalid_bool_rejected() {
        let err = Config::from_lookup(lookup_from(&[(ENV_ECHO, "maybe")])).unwrap_err();
        assert!(err.to_string().contains(ENV_ECHO));
    }
}
