//! Properties file source with hot reload.
//!
//! The file is TOML with string values at the top level:
//!
//! ```toml
//! "routing.sinkConfig" = '''{"default": {"type": "local"}}'''
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::property::{Listeners, PropertyError, PropertyListener, PropertySource, Subscription};

/// A property source backed by a watched TOML file.
///
/// When opened with [`FilePropertySource::open`], changes are delivered on the
/// file watcher's thread. Only keys whose value is new or different from the
/// last read are notified. A key removed from the file is dropped without
/// notifying anyone: readers see their fallback from then on, while whatever a
/// listener last applied stays in effect until the key is written again.
pub struct FilePropertySource {
    path: PathBuf,
    values: Arc<DashMap<String, String>>,
    listeners: Arc<Listeners>,
    _watcher: Option<RecommendedWatcher>,
}

impl FilePropertySource {
    /// Read `path` without watching it; changes are picked up by [`reload`](Self::reload).
    /// A missing file starts out empty.
    pub fn load(path: &Path) -> Result<Self, PropertyError> {
        let values = Arc::new(DashMap::new());

        match read_properties(path) {
            Ok(initial) => {
                for (key, value) in initial {
                    values.insert(key, value);
                }
            }
            Err(PropertyError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = ?path, "Properties file not found, starting empty");
            }
            Err(e) => return Err(e),
        }

        Ok(Self {
            path: path.to_path_buf(),
            values,
            listeners: Arc::new(Listeners::default()),
            _watcher: None,
        })
    }

    /// Read `path` and start watching it for changes.
    pub fn open(path: &Path) -> Result<Self, PropertyError> {
        let mut source = Self::load(path)?;

        let watched = source.path.clone();
        let cb_values = source.values.clone();
        let cb_listeners = source.listeners.clone();

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    let ours = event.paths.iter().any(|p| p.file_name() == watched.file_name());
                    if ours && (event.kind.is_modify() || event.kind.is_create()) {
                        tracing::debug!(path = ?watched, "Properties file change detected");
                        if let Err(e) = refresh(&watched, &cb_values, &cb_listeners) {
                            tracing::error!(path = ?watched, error = %e, "Failed to reload properties. Keeping current values.");
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }, Config::default().with_poll_interval(Duration::from_secs(2)))?;

        // Watch the directory so editors that replace the file are still seen
        watcher.watch(watch_dir(path), RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, keys = source.values.len(), "Properties file watcher started");
        source._watcher = Some(watcher);
        Ok(source)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file now. Returns the number of keys that changed.
    pub fn reload(&self) -> Result<usize, PropertyError> {
        refresh(&self.path, &self.values, &self.listeners)
    }
}

impl PropertySource for FilePropertySource {
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

fn watch_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Parse a properties file into key → string value.
pub fn read_properties(path: &Path) -> Result<BTreeMap<String, String>, PropertyError> {
    let content = fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&content)?;

    let mut values = BTreeMap::new();
    for (key, value) in table {
        match value {
            toml::Value::String(text) => {
                values.insert(key, text);
            }
            other => {
                tracing::warn!(key = %key, kind = other.type_str(), "Ignoring non-string property");
            }
        }
    }
    Ok(values)
}

fn refresh(
    path: &Path,
    values: &DashMap<String, String>,
    listeners: &Listeners,
) -> Result<usize, PropertyError> {
    let fresh = read_properties(path)?;
    let _delivery = listeners.lock_delivery();

    values.retain(|key, _| {
        let keep = fresh.contains_key(key);
        if !keep {
            tracing::info!(key = %key, "Property removed from file");
        }
        keep
    });

    let mut changed = 0;
    for (key, value) in fresh {
        let differs = values.get(&key).map_or(true, |current| *current != value);
        if differs {
            values.insert(key.clone(), value.clone());
            listeners.notify(&key, &value);
            changed += 1;
        }
    }
    Ok(changed)
}
