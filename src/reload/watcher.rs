//! Property watcher driving the reload pipeline.

use crate::property::{DynamicStringProperty, Subscription};
use crate::reload::pipeline::{ApplyMode, ReloadOutcome, ReloadPipeline};

/// Keeps the sink configuration property wired to the reload pipeline.
///
/// Created once at startup and held for the process lifetime; dropping it
/// stops hot reloads.
#[derive(Debug)]
pub struct SinkConfigurator {
    property: DynamicStringProperty,
    initial: ReloadOutcome,
    _subscription: Subscription,
}

impl SinkConfigurator {
    /// Apply the current property value as the initial load, then apply every
    /// later change as a hot reload.
    ///
    /// The initial load and the registration happen under the source's
    /// delivery ordering, so no change is lost or applied out of order.
    pub fn start(property: DynamicStringProperty, pipeline: ReloadPipeline) -> Self {
        let listener = pipeline.clone();
        let mut initial = None;
        let subscription = property.watch(
            |raw| initial = Some(pipeline.apply(raw, ApplyMode::InitialLoad)),
            move |raw| {
                listener.apply(raw, ApplyMode::HotReload);
            },
        );
        tracing::info!(key = property.key(), "Sink config listener registered");

        let initial = initial.unwrap_or_else(|| {
            tracing::warn!(key = property.key(), "Property source skipped the initial read");
            pipeline.apply(&property.get(), ApplyMode::InitialLoad)
        });

        Self {
            property,
            initial,
            _subscription: subscription,
        }
    }

    /// Outcome of the initial load.
    pub fn initial_outcome(&self) -> &ReloadOutcome {
        &self.initial
    }

    pub fn property(&self) -> &DynamicStringProperty {
        &self.property
    }
}
