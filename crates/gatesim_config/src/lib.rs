//! Parsing and validation of `gatesim.toml` configuration files.
//!
//! This crate reads the optional configuration file and produces a
//! strongly-typed [`GatesimConfig`] holding simulation budgets, the signal
//! resolution policy, and output settings.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    load_config, load_config_from_path, load_config_from_str, load_config_or_default,
    CONFIG_FILE_NAME,
};
pub use types::*;
