//! Hot reload bridge for sink routing configuration.
//!
//! A dynamic string property holds a JSON object of named sink
//! configurations. This crate watches it, decodes and validates every new
//! value, and hands the result to a [`manager::SinkManager`]: the first time
//! through `initial_set`, afterwards through `set`. A bad value is logged and
//! dropped; the active configuration is never touched by a failed update.

pub mod config;
pub mod lifecycle;
pub mod manager;
pub mod observability;
pub mod property;
pub mod reload;
pub mod sink;

pub use config::ConfiguratorConfig;
pub use manager::{ActiveSinkSet, SinkManager};
pub use reload::{ApplyMode, ReloadPipeline, SinkConfigurator};
pub use sink::{SinkConfig, SinkConfigMap, SinkTypeRegistry};
