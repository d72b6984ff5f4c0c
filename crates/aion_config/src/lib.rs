//! Parsing and validation of `route.toml` router configuration files.
//!
//! This crate reads the routing configuration and produces a strongly-typed
//! [`RouteConfig`]. Every field has a default, so an empty file (or no file at
//! all, via [`RouteConfig::default`]) yields the standard router behavior.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
