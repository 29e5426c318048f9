//! Routing manager seam.
//!
//! # Data Flow
//! ```text
//! reload pipeline (validated SinkConfigMap)
//!     → SinkManager::initial_set  (first application, nothing to replace)
//!     → SinkManager::set          (every later application, swap in place)
//! ```
//!
//! # Design Decisions
//! - The manager owns the map once it is handed over
//! - Starting, draining and retiring sinks is the manager's job; the
//!   reload path only guarantees it never forwards an unvalidated map
//! - `ActiveSinkSet` is the in-process implementation used by the binary

pub mod active;

use thiserror::Error;

use crate::sink::SinkConfigMap;

pub use active::ActiveSinkSet;

/// Errors raised by a routing manager while applying a configuration.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// `initial_set` was called after a configuration was already active.
    #[error("sink set already initialized")]
    AlreadyInitialized,

    /// The manager refused the configuration.
    #[error("sink manager rejected configuration: {0}")]
    Rejected(String),

    /// The manager panicked while applying.
    #[error("sink manager panicked: {0}")]
    Panicked(String),
}

/// Receiver of validated sink configuration sets.
///
/// Implementations must tolerate `set` being called without a prior
/// `initial_set` (the initial load can fail) and must be safe to call from
/// whichever thread delivers configuration notifications.
pub trait SinkManager: Send + Sync {
    /// Apply the first configuration of the process lifetime.
    fn initial_set(&self, sinks: SinkConfigMap) -> Result<(), ApplyError>;

    /// Replace the active configuration.
    fn set(&self, sinks: SinkConfigMap) -> Result<(), ApplyError>;
}
