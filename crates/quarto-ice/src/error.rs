/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template mutation.

use thiserror::Error;

/// Errors that can occur while operating on a template.
#[derive(Debug, Error)]
pub enum IceError {
    /// A caller-supplied argument violates the operation's contract.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The template was closed and can no longer be mutated.
    #[error("Invalid state: cannot {operation} a closed template")]
    InvalidState { operation: &'static str },

    /// An options or data document could not be deserialized.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O error (e.g., serializing the tree or reading a document).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IceError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        IceError::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        IceError::Config {
            message: message.into(),
        }
    }
}

/// Result type for template operations.
pub type IceResult<T> = Result<T, IceError>;
