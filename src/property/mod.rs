//! Dynamic property sources.
//!
//! # Data Flow
//! ```text
//! external store (memory map, watched properties file)
//!     → PropertySource::get        (initial read)
//!     → PropertySource::subscribe  (change notifications, in store order)
//!     → DynamicStringProperty      (one key + static fallback)
//!     → listener callback with the new raw text
//! ```
//!
//! # Design Decisions
//! - Sources own their notification thread; listeners run on it synchronously
//! - Delivery is serialized per source, so listeners observe changes in order
//! - A `Subscription` unregisters on drop; long-lived owners just keep it

pub mod file;
pub mod memory;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use thiserror::Error;

pub use file::FilePropertySource;
pub use memory::MemoryPropertySource;

/// Callback receiving the new value of a property.
pub type PropertyListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Errors raised by property sources.
#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// A store of named string values that notifies on change.
pub trait PropertySource: Send + Sync {
    /// Current value of `key`, if the store holds one.
    fn get(&self, key: &str) -> Option<String>;

    /// Register `listener` for changes to `key`.
    fn subscribe(&self, key: &str, listener: PropertyListener) -> Subscription;

    /// Call `initial` once with the current value of `key`, then register
    /// `listener`. No change is delivered between the two, so every later
    /// value reaches `listener` after `initial` has returned.
    fn watch(
        &self,
        key: &str,
        initial: &mut dyn FnMut(Option<&str>),
        listener: PropertyListener,
    ) -> Subscription;
}

/// A single string property with a static fallback.
#[derive(Clone)]
pub struct DynamicStringProperty {
    key: String,
    default: String,
    source: Arc<dyn PropertySource>,
}

impl DynamicStringProperty {
    pub fn new(key: impl Into<String>, default: impl Into<String>, source: Arc<dyn PropertySource>) -> Self {
        Self {
            key: key.into(),
            default: default.into(),
            source,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current value, or the static fallback when the source has none.
    pub fn get(&self) -> String {
        self.source
            .get(&self.key)
            .unwrap_or_else(|| self.default.clone())
    }

    /// Run `initial` with the current value (or the fallback), then register
    /// `listener` for every later change, with nothing delivered in between.
    pub fn watch<I, F>(&self, initial: I, listener: F) -> Subscription
    where
        I: FnOnce(&str),
        F: Fn(&str) + Send + Sync + 'static,
    {
        let mut initial = Some(initial);
        let default = self.default.as_str();
        self.source.watch(
            &self.key,
            &mut |current: Option<&str>| {
                if let Some(initial) = initial.take() {
                    initial(current.unwrap_or(default));
                }
            },
            Arc::new(listener),
        )
    }
}

impl std::fmt::Debug for DynamicStringProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicStringProperty")
            .field("key", &self.key)
            .field("default", &self.default)
            .finish()
    }
}

/// Listener table shared by the source implementations.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: AtomicU64,
    by_key: DashMap<String, Vec<(u64, PropertyListener)>>,
    // Reentrant so a listener may update the source it listens to
    delivery: ReentrantMutex<()>,
}

impl Listeners {
    pub(crate) fn add(self: &Arc<Self>, key: &str, listener: PropertyListener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.by_key
            .entry(key.to_string())
            .or_default()
            .push((id, listener));

        Subscription {
            key: key.to_string(),
            id,
            listeners: Arc::downgrade(self),
        }
    }

    fn remove(&self, key: &str, id: u64) {
        if let Some(mut entries) = self.by_key.get_mut(key) {
            entries.retain(|(entry_id, _)| *entry_id != id);
        }
    }

    /// Hold while updating a value and notifying, so deliveries don't interleave.
    pub(crate) fn lock_delivery(&self) -> ReentrantMutexGuard<'_, ()> {
        self.delivery.lock()
    }

    /// Call every listener registered for `key`.
    pub(crate) fn notify(&self, key: &str, value: &str) {
        let _delivery = self.lock_delivery();
        // Clone out of the map so listeners run without holding a shard lock
        let targets: Vec<PropertyListener> = self
            .by_key
            .get(key)
            .map(|entries| entries.iter().map(|(_, listener)| listener.clone()).collect())
            .unwrap_or_default();

        tracing::trace!(key, listeners = targets.len(), "Delivering property change");
        for listener in targets {
            listener(value);
        }
    }

    #[cfg(test)]
    pub(crate) fn count(&self, key: &str) -> usize {
        self.by_key.get(key).map(|entries| entries.len()).unwrap_or(0)
    }
}

/// Registration handle; the listener is removed when this is dropped.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    key: String,
    id: u64,
    listeners: Weak<Listeners>,
}

impl Subscription {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(&self.key, self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_dynamic_property_fallback() {
        let source = Arc::new(MemoryPropertySource::new());
        let property = DynamicStringProperty::new("k", "fallback", source.clone());

        assert_eq!(property.get(), "fallback");
        source.set("k", "live");
        assert_eq!(property.get(), "live");
    }

    #[test]
    fn test_dropping_subscription_unregisters() {
        let listeners = Arc::new(Listeners::default());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let subscription = listeners.add("k", Arc::new(move |v: &str| sink.lock().push(v.to_string())));
        assert_eq!(listeners.count("k"), 1);

        listeners.notify("k", "one");
        listeners.notify("other", "ignored");
        drop(subscription);
        listeners.notify("k", "two");

        assert_eq!(listeners.count("k"), 0);
        assert_eq!(*seen.lock(), vec!["one".to_string()]);
    }
}
