//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Broadcast could not run to completion
    #[error("Broadcast failed: {message}")]
    Broadcast { message: String },

    /// Operator prompt could not be read
    #[error("Failed to read delay from stdin: {0}")]
    Prompt(#[source] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn broadcast(message: impl Into<String>) -> Self {
        Self::Broadcast {
            message: message.into(),
        }
    }
}
