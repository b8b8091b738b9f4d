//! # World Error Types
//!
//! Generation never fails. These errors come from loading configuration
//! and drop tables.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up a world.
#[derive(Error, Debug)]
pub enum WorldError {
    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A TOML document was malformed.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value was out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A drop table named a block we do not know.
    #[error("unknown block: {0}")]
    UnknownBlock(String),
}

/// Result type for world setup operations.
pub type WorldResult<T> = Result<T, WorldError>;

/// Reads a whole file, tagging failures with the path.
pub(crate) fn read_file(path: &std::path::Path) -> WorldResult<String> {
    std::fs::read_to_string(path).map_err(|source| WorldError::Io {
        path: path.to_path_buf(),
        source,
    })
}
