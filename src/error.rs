//! Error types for table construction

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading inputs or building the table
#[derive(Debug, Error)]
pub enum Ip2AsError {
    /// An input or output file could not be opened, read or written
    #[error("{}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A line in a strictly parsed source was malformed
    ///
    /// Line numbers are 1-based so they match what an editor shows.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        /// File containing the bad line
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        message: String,
    },

    /// The exchange-point registry was not JSON of a supported shape
    #[error("{}: invalid exchange-point registry: {source}", path.display())]
    Json {
        /// Registry file
        path: PathBuf,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// An AS-origin token did not follow the `_` / `{a,b}` grammar
    #[error("invalid AS-origin token: {0:?}")]
    InvalidToken(String),

    /// Invalid build configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Ip2AsError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a parse error for `path` at 1-based `line`
    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Ip2AsError>;
