//! Errors raised while reading `gatesim.toml`.

use std::path::PathBuf;

/// Failure to obtain a usable configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The contents are not valid TOML or do not match the schema.
    #[error("malformed configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The contents parsed but a value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
