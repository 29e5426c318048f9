//! Bootstrap configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ConfiguratorConfig (validated, immutable)
//!     → decides the property source, key and static fallback
//! ```
//!
//! # Design Decisions
//! - Static for the process lifetime; only the sink property is dynamic
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::{ConfiguratorConfig, ObservabilityConfig, PropertyConfig, PropertySourceKind};
