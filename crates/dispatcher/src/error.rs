//! Dispatcher error types

use thiserror::Error;

use crate::scheduler::SchedulerState;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Scheduler is not in the state the operation needs
    #[error("scheduler is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: SchedulerState,
        actual: SchedulerState,
    },

    /// Job queue could not be built; the run was aborted
    #[error("run aborted, job queue unavailable: {0}")]
    Ingestion(#[source] contracts::ContractError),

    /// Channel creation error
    #[error("failed to create channel '{name}': {message}")]
    ChannelCreation { name: String, message: String },

    /// Reporter creation error
    #[error("failed to create reporter '{name}': {message}")]
    ReporterCreation { name: String, message: String },

    /// Contract error
    #[error("contract error: {0}")]
    Contract(#[from] contracts::ContractError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatcherError {
    /// Create a channel creation error
    pub fn channel_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ChannelCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a reporter creation error
    pub fn reporter_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReporterCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
