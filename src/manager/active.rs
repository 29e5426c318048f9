//! In-process active sink set.
//!
//! # Responsibilities
//! - Hold the currently active `SinkConfigMap`
//! - Swap it atomically on update
//! - Report which sinks were added, removed or changed
//!
//! # Design Decisions
//! - Readers never lock (`ArcSwapOption`)
//! - Writers are serialized so the diff is computed against the map being replaced

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;

use crate::manager::{ApplyError, SinkManager};
use crate::observability::metrics;
use crate::sink::SinkConfigMap;

/// Difference between two sink sets, by name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SinkSetDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

impl SinkSetDiff {
    /// Compare `previous` (possibly empty) with `next`.
    pub fn between(previous: Option<&SinkConfigMap>, next: &SinkConfigMap) -> Self {
        let mut diff = Self::default();
        let Some(previous) = previous else {
            diff.added = next.keys().cloned().collect();
            return diff;
        };

        for (name, config) in next {
            match previous.get(name) {
                None => diff.added.push(name.clone()),
                Some(old) if old != config => diff.changed.push(name.clone()),
                Some(_) => {}
            }
        }
        diff.removed = previous
            .keys()
            .filter(|name| !next.contains_key(*name))
            .cloned()
            .collect();
        diff
    }

    /// True when both sets hold the same sinks with the same configuration.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// The process-wide active sink configuration.
#[derive(Default)]
pub struct ActiveSinkSet {
    active: ArcSwapOption<SinkConfigMap>,
    write: Mutex<()>,
}

impl ActiveSinkSet {
    /// Create an empty set (nothing active yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// The active configuration, if any has been applied.
    pub fn snapshot(&self) -> Option<Arc<SinkConfigMap>> {
        self.active.load_full()
    }

    /// Names of the active sinks.
    pub fn sink_names(&self) -> Vec<String> {
        self.active
            .load_full()
            .map(|sinks| sinks.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn install(&self, sinks: SinkConfigMap) -> SinkSetDiff {
        let previous = self.active.load_full();
        let diff = SinkSetDiff::between(previous.as_deref(), &sinks);
        let count = sinks.len();
        self.active.store(Some(Arc::new(sinks)));
        metrics::record_active_sinks(count);
        diff
    }
}

impl SinkManager for ActiveSinkSet {
    fn initial_set(&self, sinks: SinkConfigMap) -> Result<(), ApplyError> {
        let _guard = self.write.lock();
        if self.active.load().is_some() {
            return Err(ApplyError::AlreadyInitialized);
        }

        let diff = self.install(sinks);
        tracing::info!(sinks = ?diff.added, "Sink set initialized");
        Ok(())
    }

    fn set(&self, sinks: SinkConfigMap) -> Result<(), ApplyError> {
        let _guard = self.write.lock();
        let diff = self.install(sinks);

        if diff.is_empty() {
            tracing::info!("Sink set replaced with identical configuration");
        } else {
            tracing::info!(
                added = ?diff.added,
                removed = ?diff.removed,
                changed = ?diff.changed,
                "Sink set replaced"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SinkTypeRegistry;
    use serde_json::json;

    fn map(entries: &[(&str, serde_json::Value)]) -> SinkConfigMap {
        let registry = SinkTypeRegistry::with_builtin_types();
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), registry.decode(value.clone()).unwrap()))
            .collect()
    }

    #[test]
    fn test_initial_set_only_once() {
        let set = ActiveSinkSet::new();
        assert!(set.snapshot().is_none());

        set.initial_set(map(&[("default", json!({"type": "local"}))])).unwrap();
        assert_eq!(set.sink_names(), vec!["default"]);

        let err = set
            .initial_set(map(&[("default", json!({"type": "local"}))]))
            .unwrap_err();
        assert!(matches!(err, ApplyError::AlreadyInitialized));
    }

    #[test]
    fn test_set_without_initial() {
        let set = ActiveSinkSet::new();
        set.set(map(&[("default", json!({"type": "local"}))])).unwrap();
        assert_eq!(set.sink_names(), vec!["default"]);
    }

    #[test]
    fn test_set_replaces_active_map() {
        let set = ActiveSinkSet::new();
        set.initial_set(map(&[("default", json!({"type": "local"}))])).unwrap();
        let before = set.snapshot().unwrap();

        set.set(map(&[
            ("default", json!({"type": "local"})),
            ("kafka", json!({"type": "kafka"})),
        ]))
        .unwrap();

        // Old snapshot is untouched by the swap
        assert_eq!(before.len(), 1);
        assert_eq!(set.sink_names(), vec!["default", "kafka"]);
    }

    #[test]
    fn test_diff() {
        let old = map(&[
            ("default", json!({"type": "local"})),
            ("archive", json!({"type": "s3", "bucket": "a"})),
            ("events", json!({"type": "kafka"})),
        ]);
        let new = map(&[
            ("default", json!({"type": "local"})),
            ("archive", json!({"type": "s3", "bucket": "b"})),
            ("audit", json!({"type": "kafka", "topic": "audit"})),
        ]);

        let diff = SinkSetDiff::between(Some(&old), &new);
        assert_eq!(diff.added, vec!["audit"]);
        assert_eq!(diff.removed, vec!["events"]);
        assert_eq!(diff.changed, vec!["archive"]);

        assert!(SinkSetDiff::between(Some(&old), &old).is_empty());
        assert_eq!(SinkSetDiff::between(None, &new).added.len(), 3);
    }
}
