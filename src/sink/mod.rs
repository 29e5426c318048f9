//! Sink configuration model.
//!
//! # Data Flow
//! ```text
//! {"name": {"type": "...", ...}, ...}   (one JSON object per sink)
//!     → registry.rs (look up decoder by "type", deserialize payload)
//!     → SinkConfig (opaque decoded payload + original JSON)
//!     → SinkConfigMap (name → SinkConfig, must contain "default")
//! ```
//!
//! # Design Decisions
//! - The payload is opaque to the reload path; only sink owners downcast it
//! - The original JSON is retained so two configs can be compared without
//!   requiring every payload type to implement `PartialEq`
//! - Ordered map for deterministic iteration in logs and diffs

pub mod registry;
pub mod types;

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use registry::{DecodeError, SinkTypeRegistry};
pub use types::{KafkaSink, LocalFileSink, S3Sink};

/// Name of the sink every configuration must define.
pub const DEFAULT_SINK: &str = "default";

/// Mapping of sink name to its decoded configuration.
pub type SinkConfigMap = BTreeMap<String, SinkConfig>;

/// A decoded, type-specific sink payload.
pub trait SinkSpec: fmt::Debug + Send + Sync + 'static {
    /// Access the concrete payload for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// One decoded sink configuration.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    sink_type: String,
    spec: Arc<dyn SinkSpec>,
    raw: serde_json::Value,
}

impl SinkConfig {
    pub(crate) fn new(sink_type: String, spec: Arc<dyn SinkSpec>, raw: serde_json::Value) -> Self {
        Self { sink_type, spec, raw }
    }

    /// The `"type"` discriminator the payload was decoded with.
    pub fn sink_type(&self) -> &str {
        &self.sink_type
    }

    /// The decoded payload.
    pub fn spec(&self) -> &dyn SinkSpec {
        self.spec.as_ref()
    }

    /// The JSON object this config was decoded from.
    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    /// Downcast the payload to a concrete sink type.
    pub fn downcast_ref<T: SinkSpec>(&self) -> Option<&T> {
        self.spec.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for SinkConfig {
    fn eq(&self, other: &Self) -> bool {
        self.sink_type == other.sink_type && self.raw == other.raw
    }
}

impl fmt::Display for SinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sink_type)
    }
}
