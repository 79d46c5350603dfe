//! Configuration management for the RSVP server.
//!
//! Loads configuration from environment variables. Every value has a
//! default; unparsable values fall back to it.

use chrono::NaiveDateTime;
use rsvp_core::EventDetails;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Accepted format for `EVENT_START` and `EVENT_END`.
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Record storage configuration
    pub storage: StorageConfig,
    /// Metrics configuration
    pub metrics: MetricsConfig,
    /// Event exported by the calendar endpoint
    pub event: EventDetails,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_level: String,
}

/// Which backend holds the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// JSON document on disk.
    #[default]
    File,
    /// Process memory; lost on restart.
    Memory,
}

impl StorageKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend selection
    pub kind: StorageKind,
    /// Path of the JSON document (file backend only)
    pub data_file: PathBuf,
    /// Start empty instead of failing when the document is corrupt
    pub recover_corrupt: bool,
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder and route `/metrics`
    pub enabled: bool,
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), EVENT_TIME_FORMAT).ok()
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from `lookup`, which maps a variable name to its
    /// value.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = EventDetails::default();
        let text = |key: &str, default: String| lookup(key).unwrap_or(default);

        let event = EventDetails {
            title: text("EVENT_TITLE", defaults.title.clone()),
            location: text("EVENT_LOCATION", defaults.location.clone()),
            description: text("EVENT_DESCRIPTION", defaults.description.clone()),
            url: text("EVENT_URL", defaults.url.clone()),
            timezone: text("EVENT_TIMEZONE", defaults.timezone.clone()),
            start: lookup("EVENT_START")
                .and_then(|s| parse_time(&s))
                .unwrap_or(defaults.start),
            end: lookup("EVENT_END")
                .and_then(|s| parse_time(&s))
                .unwrap_or(defaults.end),
            ..defaults
        };

        Self {
            server: ServerConfig {
                host: text("HOST", "0.0.0.0".to_string()),
                port: lookup("PORT")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(8080),
                log_level: text("RUST_LOG", "info,rsvp_web=debug,tower_http=info".to_string()),
            },
            storage: StorageConfig {
                kind: lookup("RSVP_STORAGE")
                    .and_then(|s| StorageKind::parse(&s))
                    .unwrap_or_default(),
                data_file: lookup("RSVP_DATA_FILE")
                    .map_or_else(|| PathBuf::from("data/rsvps.json"), PathBuf::from),
                recover_corrupt: lookup("RSVP_RECOVER_CORRUPT")
                    .and_then(|s| parse_bool(&s))
                    .unwrap_or(false),
            },
            metrics: MetricsConfig {
                enabled: lookup("METRICS_ENABLED")
                    .and_then(|s| parse_bool(&s))
                    .unwrap_or(true),
            },
            event,
        }
    }

    /// Socket address string to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.storage.kind, StorageKind::File);
        assert_eq!(config.storage.data_file, PathBuf::from("data/rsvps.json"));
        assert!(!config.storage.recover_corrupt);
        assert!(config.metrics.enabled);
        assert_eq!(config.event, EventDetails::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("RSVP_STORAGE", "Memory"),
            ("RSVP_DATA_FILE", "/var/lib/rsvp/db.json"),
            ("RSVP_RECOVER_CORRUPT", "true"),
            ("METRICS_ENABLED", "off"),
            ("EVENT_TITLE", "Launch Party"),
            ("EVENT_START", "2027-03-01T18:30:00"),
        ]);

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.storage.kind, StorageKind::Memory);
        assert_eq!(config.storage.data_file, PathBuf::from("/var/lib/rsvp/db.json"));
        assert!(config.storage.recover_corrupt);
        assert!(!config.metrics.enabled);
        assert_eq!(config.event.title, "Launch Party");
        assert_eq!(
            config.event.start.format(EVENT_TIME_FORMAT).to_string(),
            "2027-03-01T18:30:00"
        );
        assert_eq!(config.event.end, EventDetails::default().end);
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = config_from(&[
            ("PORT", "eighty"),
            ("RSVP_STORAGE", "firestore"),
            ("METRICS_ENABLED", "maybe"),
            ("EVENT_END", "tomorrow"),
        ]);

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.kind, StorageKind::File);
        assert!(config.metrics.enabled);
        assert_eq!(config.event.end, EventDetails::default().end);
    }
}
