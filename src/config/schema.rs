//! Bootstrap configuration schema.
//!
//! This is the static, process-start configuration. The sink configuration
//! itself is not here; it arrives through the dynamic property named by
//! `property.key`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Well-known key of the dynamic sink configuration property.
pub const SINK_CONFIG_KEY: &str = "routing.sinkConfig";

/// Root configuration for the configurator process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConfiguratorConfig {
    /// Where the sink configuration property comes from.
    pub property: PropertyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backing store for the dynamic property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertySourceKind {
    /// Values live in process memory only.
    #[default]
    Memory,
    /// Values are read from a watched TOML properties file.
    File,
}

/// Dynamic property settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PropertyConfig {
    /// Property key holding the sink configuration JSON.
    pub key: String,

    /// Static fallback used until the source holds a value.
    pub initial_value: String,

    /// Which value source to use.
    pub source: PropertySourceKind,

    /// Properties file, required for the file source.
    pub path: Option<PathBuf>,
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            key: SINK_CONFIG_KEY.to_string(),
            initial_value: r#"{"default": {"type": "local"}}"#.to_string(),
            source: PropertySourceKind::Memory,
            path: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
