//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! reload pipeline, value sources, sink manager produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (reload counters, active sink gauge)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields, never interpolated strings, for anything a query might filter on
//! - Failed reloads are always visible in both logs and metrics
//! - Metrics are optional; recording without an installed exporter is a no-op

pub mod logging;
pub mod metrics;
