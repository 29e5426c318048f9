//! Built-in sink payloads.
//!
//! These describe the configuration shape only; running the sinks belongs to
//! whoever owns the routing manager.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::sink::SinkSpec;

/// Writes messages to rotating files on local disk.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalFileSink {
    /// Directory the sink writes into.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Rotate once a file reaches this many bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Rotation period, e.g. "PT1m".
    #[serde(default = "default_rotation_period")]
    pub rotation_period: String,
}

impl LocalFileSink {
    pub const TYPE: &'static str = "local";
}

fn default_output_dir() -> String {
    "/tmp/sinks".to_string()
}

fn default_max_file_size() -> u64 {
    200 * 1024 * 1024
}

fn default_rotation_period() -> String {
    "PT2m".to_string()
}

impl SinkSpec for LocalFileSink {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Produces messages to a Kafka cluster.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KafkaSink {
    /// Comma separated broker list.
    #[serde(default = "default_bootstrap_servers")]
    pub bootstrap_servers: String,

    /// Fixed topic; when absent the routing key is used.
    #[serde(default)]
    pub topic: Option<String>,

    /// Required acknowledgements ("0", "1" or "all").
    #[serde(default = "default_acks")]
    pub acks: String,
}

impl KafkaSink {
    pub const TYPE: &'static str = "kafka";
}

fn default_bootstrap_servers() -> String {
    "localhost:9092".to_string()
}

fn default_acks() -> String {
    "1".to_string()
}

impl SinkSpec for KafkaSink {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Uploads rotated files to an S3 bucket.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Sink {
    pub bucket: String,

    #[serde(default)]
    pub prefix: String,

    #[serde(default = "default_region")]
    pub region: String,
}

impl S3Sink {
    pub const TYPE: &'static str = "s3";
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl SinkSpec for S3Sink {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
