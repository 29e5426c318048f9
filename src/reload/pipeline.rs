//! Decode, validate and forward one sink configuration update.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::manager::{ApplyError, SinkManager};
use crate::observability::metrics;
use crate::sink::{DecodeError, SinkConfigMap, SinkTypeRegistry, DEFAULT_SINK};

/// Which manager entry point an update is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplyMode {
    /// First application in the process lifetime.
    InitialLoad,
    /// Any later application.
    HotReload,
}

impl ApplyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyMode::InitialLoad => "initial",
            ApplyMode::HotReload => "hot_reload",
        }
    }
}

impl fmt::Display for ApplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The raw text did not decode into a sink map.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sink config must be a JSON object")]
    NotAnObject,

    #[error("sink {name:?}: {source}")]
    Sink {
        name: String,
        #[source]
        source: DecodeError,
    },
}

/// The sink map decoded but breaks a structural rule.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("\"default\" sink should be defined")]
    MissingDefault,
}

/// Any failure inside the reload pipeline.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("apply error: {0}")]
    Apply(#[from] ApplyError),
}

impl ReloadError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ReloadError::Parse(_) => "parse",
            ReloadError::Validation(_) => "validation",
            ReloadError::Apply(_) => "apply",
        }
    }

    fn origin(&self) -> &'static str {
        match self {
            ReloadError::Apply(_) => "sink_manager",
            _ => "sink_config",
        }
    }
}

/// What happened to one update. Informational only; failures are already logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    Applied { mode: ApplyMode, sinks: usize },
    Rejected { mode: ApplyMode, kind: &'static str },
}

impl ReloadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReloadOutcome::Applied { .. })
    }
}

/// Turns raw sink configuration text into manager calls.
#[derive(Clone)]
pub struct ReloadPipeline {
    registry: Arc<SinkTypeRegistry>,
    manager: Arc<dyn SinkManager>,
}

impl ReloadPipeline {
    pub fn new(registry: Arc<SinkTypeRegistry>, manager: Arc<dyn SinkManager>) -> Self {
        Self { registry, manager }
    }

    /// Decode, validate and forward `raw`.
    ///
    /// Never fails and never panics outward: every error is logged with the
    /// offending text and the previously applied configuration stays active.
    pub fn apply(&self, raw: &str, mode: ApplyMode) -> ReloadOutcome {
        tracing::debug!(%mode, raw, "Building sink config");

        match self.try_apply(raw, mode) {
            Ok(sinks) => {
                match mode {
                    ApplyMode::InitialLoad => {
                        tracing::info!(sinks, raw, "Applied initial sink config")
                    }
                    ApplyMode::HotReload => {
                        tracing::warn!(sinks, raw, "Applied updated sink config")
                    }
                }
                metrics::record_reload(mode, "applied");
                ReloadOutcome::Applied { mode, sinks }
            }
            Err(e) => {
                tracing::error!(
                    %mode,
                    kind = e.kind(),
                    origin = e.origin(),
                    error = %e,
                    raw,
                    "Failed to build sink config"
                );
                metrics::record_reload(mode, e.kind());
                ReloadOutcome::Rejected { mode, kind: e.kind() }
            }
        }
    }

    /// Decode and validate `raw` without forwarding it.
    pub fn parse(&self, raw: &str) -> Result<SinkConfigMap, ReloadError> {
        let sinks = decode(&self.registry, raw)?;
        validate(&sinks)?;
        Ok(sinks)
    }

    fn try_apply(&self, raw: &str, mode: ApplyMode) -> Result<usize, ReloadError> {
        let sinks = self.parse(raw)?;
        let count = sinks.len();

        let manager = &self.manager;
        let result = panic::catch_unwind(AssertUnwindSafe(|| match mode {
            ApplyMode::InitialLoad => manager.initial_set(sinks),
            ApplyMode::HotReload => manager.set(sinks),
        }));

        match result {
            Ok(applied) => applied?,
            Err(payload) => return Err(ApplyError::Panicked(panic_message(payload.as_ref())).into()),
        }
        Ok(count)
    }
}

impl fmt::Debug for ReloadPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadPipeline")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Decode `raw` as a JSON object of sink name → sink payload.
pub fn decode(registry: &SinkTypeRegistry, raw: &str) -> Result<SinkConfigMap, ParseError> {
    let object = match serde_json::from_str::<Value>(raw)? {
        Value::Object(object) => object,
        _ => return Err(ParseError::NotAnObject),
    };

    object
        .into_iter()
        .map(|(name, value)| match registry.decode(value) {
            Ok(config) => Ok((name, config)),
            Err(source) => Err(ParseError::Sink { name, source }),
        })
        .collect()
}

/// Check the structural contract with the sink manager.
pub fn validate(sinks: &SinkConfigMap) -> Result<(), ValidationError> {
    if sinks.contains_key(DEFAULT_SINK) {
        Ok(())
    } else {
        Err(ValidationError::MissingDefault)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
