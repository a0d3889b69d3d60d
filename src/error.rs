//! Error types for the termrank library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`TermRankError`] enum.
//!
//! # Examples
//!
//! ```
//! use termrank::error::{Result, TermRankError};
//!
//! fn open_index() -> Result<()> {
//!     Err(TermRankError::store_unavailable("index directory is gone"))
//! }
//!
//! match open_index() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for termrank operations.
#[derive(Error, Debug)]
pub enum TermRankError {
    /// I/O errors (file operations, directory enumeration, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The statistics store is unreachable, closed or corrupt.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A term or document is absent from the store.
    ///
    /// Used as a control signal between the engine and its store; search and
    /// index callers never see it.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Encoding or decoding of stored records failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid engine or store configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure carrying `anyhow` context, such as an unreadable config file
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with TermRankError.
pub type Result<T> = std::result::Result<T, TermRankError>;

impl TermRankError {
    /// Create a new store unavailable error.
    pub fn store_unavailable<S: Into<String>>(msg: S) -> Self {
        TermRankError::StoreUnavailable(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        TermRankError::NotFound(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        TermRankError::Serialization(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        TermRankError::InvalidConfig(msg.into())
    }

    /// Whether this error is the `NotFound` control signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TermRankError::NotFound(_))
    }
}

impl From<bincode::Error> for TermRankError {
    fn from(err: bincode::Error) -> Self {
        TermRankError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = TermRankError::store_unavailable("disk detached");
        assert_eq!(error.to_string(), "Store unavailable: disk detached");

        let error = TermRankError::not_found("term 'fox'");
        assert_eq!(error.to_string(), "Not found: term 'fox'");
        assert!(error.is_not_found());

        let error = TermRankError::invalid_config("no store");
        assert_eq!(error.to_string(), "Invalid configuration: no store");
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = TermRankError::from(io_error);

        match error {
            TermRankError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_anyhow_context_is_displayed() {
        use anyhow::Context;

        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let error = TermRankError::from(result.context("reading config.json").unwrap_err());

        assert_eq!(error.to_string(), "reading config.json: gone");
    }
}
