//! Error types for the Augur library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`AugurError`] enum.
//!
//! # Examples
//!
//! ```
//! use augur::error::{AugurError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(AugurError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Augur operations.
///
/// Uses the `thiserror` crate for automatic `Error` trait implementation and
/// provides convenient constructor methods for the string-carrying variants.
#[derive(Error, Debug)]
pub enum AugurError {
    /// I/O errors (model file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (cleaning pattern, tokenization)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Model-related errors (malformed stored models, bad keys)
    #[error("Model error: {0}")]
    Model(String),

    /// Training-related errors
    #[error("Training error: {0}")]
    Training(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with AugurError.
pub type Result<T> = std::result::Result<T, AugurError>;

impl AugurError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        AugurError::Analysis(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        AugurError::Model(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        AugurError::Training(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        AugurError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        AugurError::Other(msg.into())
    }
}
