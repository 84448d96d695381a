//! Parsing and validation of `loom.toml` build configuration.
//!
//! The configuration maps artifact extensions to provider kinds, languages to
//! compiler backends, and lists the directories searched for external assemblies.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
