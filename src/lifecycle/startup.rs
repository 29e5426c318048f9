//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the configured property source
//! - Build the sink type registry and the active sink set
//! - Start the configurator, which performs the initial load

use std::sync::Arc;

use crate::config::schema::{ConfiguratorConfig, PropertySourceKind};
use crate::manager::ActiveSinkSet;
use crate::property::{
    DynamicStringProperty, FilePropertySource, MemoryPropertySource, PropertyError, PropertySource,
};
use crate::reload::{ReloadPipeline, SinkConfigurator};
use crate::sink::SinkTypeRegistry;

/// Everything that must stay alive while the process runs.
pub struct Running {
    pub sinks: Arc<ActiveSinkSet>,
    pub source: Arc<dyn PropertySource>,
    pub configurator: SinkConfigurator,
}

/// Wire up the sink configuration bridge described by `config`.
pub fn start(config: &ConfiguratorConfig) -> Result<Running, PropertyError> {
    let property_config = &config.property;

    let source: Arc<dyn PropertySource> = match (property_config.source, &property_config.path) {
        (PropertySourceKind::File, Some(path)) => Arc::new(FilePropertySource::open(path)?),
        (PropertySourceKind::File, None) => {
            // Validation rejects this; fall back rather than fail
            tracing::warn!("File property source without a path, using memory source");
            Arc::new(MemoryPropertySource::new())
        }
        (PropertySourceKind::Memory, _) => Arc::new(MemoryPropertySource::new()),
    };

    let registry = Arc::new(SinkTypeRegistry::with_builtin_types());
    tracing::debug!(types = ?registry.type_names(), "Sink types registered");

    let sinks = Arc::new(ActiveSinkSet::new());
    let pipeline = ReloadPipeline::new(registry, sinks.clone());

    let property = DynamicStringProperty::new(
        property_config.key.clone(),
        property_config.initial_value.clone(),
        source.clone(),
    );
    let configurator = SinkConfigurator::start(property, pipeline);

    Ok(Running {
        sinks,
        source,
        configurator,
    })
}
