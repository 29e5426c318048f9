//! Sink configuration hot reload.
//!
//! # Data Flow
//! ```text
//! DynamicStringProperty
//!     → watcher.rs: initial read      → apply(raw, InitialLoad)
//!     → watcher.rs: change listener   → apply(raw, HotReload)
//!     → pipeline.rs:
//!         decode JSON object → SinkTypeRegistry per entry   (ParseError)
//!         require "default" sink                            (ValidationError)
//!         SinkManager::initial_set / SinkManager::set       (ApplyError)
//!     → failures logged and suppressed; active sinks untouched
//! ```
//!
//! # Design Decisions
//! - The manager is only called once decode and validation both succeed
//! - Nothing escapes `apply`: it runs on a notification thread it does not own
//! - No diffing or deduplication; identical updates are forwarded again
//! - No locking of its own; ordering comes from the property source

pub mod pipeline;
pub mod watcher;

pub use pipeline::{ApplyMode, ParseError, ReloadError, ReloadOutcome, ReloadPipeline, ValidationError};
pub use watcher::SinkConfigurator;
