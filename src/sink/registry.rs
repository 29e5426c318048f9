//! Polymorphic sink decoder keyed by the `"type"` discriminator.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::sink::types::{KafkaSink, LocalFileSink, S3Sink};
use crate::sink::{SinkConfig, SinkSpec};

/// Field holding the sink type inside each payload.
pub const TYPE_FIELD: &str = "type";

/// Errors raised while decoding a single sink payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is not a JSON object.
    #[error("sink payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The payload has no string `"type"` member.
    #[error("sink payload has no \"type\" field")]
    MissingType,

    /// No decoder is registered for the discriminator.
    #[error("unknown sink type: {0}")]
    UnknownType(String),

    /// The payload does not match the registered type's shape.
    #[error("invalid {sink_type} sink: {source}")]
    InvalidShape {
        sink_type: String,
        #[source]
        source: serde_json::Error,
    },
}

type Decoder = Box<dyn Fn(Value) -> Result<Arc<dyn SinkSpec>, serde_json::Error> + Send + Sync>;

/// Registry of sink types known to this process.
#[derive(Default)]
pub struct SinkTypeRegistry {
    decoders: HashMap<String, Decoder>,
}

impl SinkTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in sink types registered.
    pub fn with_builtin_types() -> Self {
        let mut registry = Self::new();
        registry.register::<LocalFileSink>(LocalFileSink::TYPE);
        registry.register::<KafkaSink>(KafkaSink::TYPE);
        registry.register::<S3Sink>(S3Sink::TYPE);
        registry
    }

    /// Register `T` under `type_name`. A later registration replaces an earlier one.
    pub fn register<T>(&mut self, type_name: &str)
    where
        T: DeserializeOwned + SinkSpec,
    {
        let decoder: Decoder = Box::new(|value: Value| -> Result<Arc<dyn SinkSpec>, serde_json::Error> {
            let spec: T = serde_json::from_value(value)?;
            Ok(Arc::new(spec) as Arc<dyn SinkSpec>)
        });
        if self.decoders.insert(type_name.to_string(), decoder).is_some() {
            tracing::debug!(sink_type = type_name, "Replaced sink type decoder");
        }
    }

    /// Whether a decoder exists for `type_name`.
    pub fn contains(&self, type_name: &str) -> bool {
        self.decoders.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Decode one sink payload.
    pub fn decode(&self, value: Value) -> Result<SinkConfig, DecodeError> {
        let object = match &value {
            Value::Object(object) => object,
            other => return Err(DecodeError::NotAnObject(json_kind(other))),
        };

        let sink_type = object
            .get(TYPE_FIELD)
            .and_then(Value::as_str)
            .ok_or(DecodeError::MissingType)?
            .to_string();

        let decoder = self
            .decoders
            .get(&sink_type)
            .ok_or_else(|| DecodeError::UnknownType(sink_type.clone()))?;

        let spec = decoder(value.clone()).map_err(|source| DecodeError::InvalidShape {
            sink_type: sink_type.clone(),
            source,
        })?;

        Ok(SinkConfig::new(sink_type, spec, value))
    }
}

impl fmt::Debug for SinkTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkTypeRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
