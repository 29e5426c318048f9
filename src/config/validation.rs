//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the file source has a path to watch
//! - Check addresses and log levels parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ConfiguratorConfig → Result<(), Vec<ValidationIssue>>
//! - The initial sink value is not checked here; a bad value is a reload
//!   failure like any other and must not stop the process

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{ConfiguratorConfig, PropertySourceKind};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A single semantic problem with the bootstrap configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("property.key must not be empty")]
    EmptyPropertyKey,

    #[error("property.path is required when property.source = \"file\"")]
    MissingPropertyPath,

    #[error("invalid observability.metrics_address: {0}")]
    InvalidMetricsAddress(String),

    #[error("invalid observability.log_level: {0}")]
    InvalidLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ConfiguratorConfig) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if config.property.key.trim().is_empty() {
        issues.push(ValidationIssue::EmptyPropertyKey);
    }

    if config.property.source == PropertySourceKind::File && config.property.path.is_none() {
        issues.push(ValidationIssue::MissingPropertyPath);
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        issues.push(ValidationIssue::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    // Full filter directives ("sink_configurator=debug") are passed through
    let level = observability.log_level.to_ascii_lowercase();
    if !level.contains('=') && !LOG_LEVELS.contains(&level.as_str()) {
        issues.push(ValidationIssue::InvalidLogLevel(observability.log_level.clone()));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ConfiguratorConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_issues() {
        let mut config = ConfiguratorConfig::default();
        config.property.key = "  ".into();
        config.property.source = PropertySourceKind::File;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "not-an-address".into();
        config.observability.log_level = "loud".into();

        let issues = validate_config(&config).unwrap_err();
        assert_eq!(
            issues,
            vec![
                ValidationIssue::EmptyPropertyKey,
                ValidationIssue::MissingPropertyPath,
                ValidationIssue::InvalidMetricsAddress("not-an-address".into()),
                ValidationIssue::InvalidLogLevel("loud".into()),
            ]
        );
    }

    #[test]
    fn test_file_source_with_path() {
        let mut config = ConfiguratorConfig::default();
        config.property.source = PropertySourceKind::File;
        config.property.path = Some(PathBuf::from("/etc/sinks.toml"));
        config.observability.log_level = "sink_configurator=debug".into();
        assert!(validate_config(&config).is_ok());
    }
}
