//! Configuration error types.

use std::path::PathBuf;

/// Errors that can occur when loading, saving, or parsing configuration.
///
/// File-level variants carry the path of the offending `config.ron` so a
/// failure names which config store it came from.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        /// The config file that could not be read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the config file or create its directory.
    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        /// The file or directory that could not be written.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file was present but is not valid RON.
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        /// The config file that failed to parse.
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// Failed to serialize config to RON.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] ron::Error),
}
