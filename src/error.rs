//! Error type for input and configuration failures.
//!
//! Infeasible loads are not errors: they are reported through
//! [`Solution::unassigned`](crate::models::Solution::unassigned).

use std::fmt;
use std::path::PathBuf;

/// Errors raised while reading loads, building the task graph, or
/// validating configuration.
#[derive(Debug)]
pub enum Error {
    /// The load file could not be read.
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A line of the load file is malformed.
    Parse {
        /// 1-based line number in the input.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// Load ids must be positive.
    InvalidLoadId {
        /// Offending id.
        id: usize,
    },
    /// The same load id appears more than once.
    DuplicateLoad {
        /// Repeated id.
        id: usize,
    },
    /// A configuration value is out of range.
    InvalidConfig(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => {
                write!(f, "cannot read load file [{}]: {source}", path.display())
            }
            Error::Parse { line, reason } => write!(f, "line {line}: {reason}"),
            Error::InvalidLoadId { id } => write!(f, "load id must be positive, got {id}"),
            Error::DuplicateLoad { id } => write!(f, "load id {id} appears more than once"),
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
