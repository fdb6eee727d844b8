//! Error types for the audit subsystem

use std::fmt;
use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the audit subsystem
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or extracted
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration loaded but holds an unusable value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Audit storage backend failed (append or purge)
    #[error("Audit storage error: {0}")]
    Storage(String),

    /// No audit descriptor is registered under the operation identifier
    #[error("Unknown audited operation: {0}")]
    UnknownOperation(String),

    /// An audit descriptor is already registered under the operation identifier
    #[error("Audited operation already registered: {0}")]
    DuplicateOperation(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a storage error from any displayable backend failure
    pub fn storage(context: &str, err: impl fmt::Display) -> Self {
        Self::Storage(format!("{}: {}", context, err))
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
