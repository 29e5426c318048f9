//! Shared utilities for integration tests.

use std::sync::Arc;

use parking_lot::Mutex;
use sink_configurator::manager::{ApplyError, SinkManager};
use sink_configurator::sink::SinkConfigMap;
use sink_configurator::{ReloadPipeline, SinkTypeRegistry};

/// Which entry point a recorded call went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    InitialSet,
    Set,
}

/// How the recording manager answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Behaviour {
    Accept,
    Reject,
    Panic,
}

/// A sink manager that records every call it receives.
pub struct RecordingManager {
    calls: Mutex<Vec<(Call, SinkConfigMap)>>,
    behaviour: Mutex<Behaviour>,
}

#[allow(dead_code)]
impl RecordingManager {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            behaviour: Mutex::new(Behaviour::Accept),
        })
    }

    pub fn behave(&self, behaviour: Behaviour) {
        *self.behaviour.lock() = behaviour;
    }

    pub fn calls(&self) -> Vec<(Call, SinkConfigMap)> {
        self.calls.lock().clone()
    }

    pub fn call_kinds(&self) -> Vec<Call> {
        self.calls.lock().iter().map(|(call, _)| *call).collect()
    }

    fn record(&self, call: Call, sinks: SinkConfigMap) -> Result<(), ApplyError> {
        self.calls.lock().push((call, sinks));
        match *self.behaviour.lock() {
            Behaviour::Accept => Ok(()),
            Behaviour::Reject => Err(ApplyError::Rejected("sink failed to start".into())),
            Behaviour::Panic => panic!("sink manager exploded"),
        }
    }
}

impl SinkManager for RecordingManager {
    fn initial_set(&self, sinks: SinkConfigMap) -> Result<(), ApplyError> {
        self.record(Call::InitialSet, sinks)
    }

    fn set(&self, sinks: SinkConfigMap) -> Result<(), ApplyError> {
        self.record(Call::Set, sinks)
    }
}

/// A pipeline over the built-in sink types feeding `manager`.
pub fn pipeline(manager: &Arc<RecordingManager>) -> ReloadPipeline {
    ReloadPipeline::new(
        Arc::new(SinkTypeRegistry::with_builtin_types()),
        manager.clone(),
    )
}
