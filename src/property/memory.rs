//! In-process property source.

use std::sync::Arc;

use dashmap::DashMap;

use crate::property::{Listeners, PropertyListener, PropertySource, Subscription};

/// Property values held in memory, changed with [`MemoryPropertySource::set`].
///
/// Notifications run synchronously on the thread calling `set`, and are
/// delivered even when the new value equals the old one.
#[derive(Default)]
pub struct MemoryPropertySource {
    values: DashMap<String, String>,
    listeners: Arc<Listeners>,
}

impl MemoryPropertySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key` and notify its listeners.
    pub fn set(&self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let _delivery = self.listeners.lock_delivery();
        self.values.insert(key.to_string(), value.clone());
        self.listeners.notify(key, &value);
    }

    /// Remove `key`. Listeners are not notified; readers fall back to their default.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.remove(key).map(|(_, value)| value)
    }
}

impl PropertySource for MemoryPropertySource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|value| value.value().clone())
    }

    fn subscribe(&self, key: &str, listener: PropertyListener) -> Subscription {
        self.listeners.add(key, listener)
    }

    fn watch(
        &self,
        key: &str,
        initial: &mut dyn FnMut(Option<&str>),
        listener: PropertyListener,
    ) -> Subscription {
        let _delivery = self.listeners.lock_delivery();
        let current = self.get(key);
        initial(current.as_deref());
        self.listeners.add(key, listener)
    }
}
