//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Bootstrap config → Property source → Sink manager → Configurator (initial load)
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stop; the configurator is dropped with the process
//! ```
//!
//! # Design Decisions
//! - Ordered startup: source first, then manager, then the initial load
//! - A bad initial sink config is logged, not fatal; the next change can fix it
//! - A source that cannot be opened is fatal

pub mod signals;
pub mod startup;

pub use signals::wait_for_shutdown;
pub use startup::{start, Running};
