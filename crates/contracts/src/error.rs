//! Layered error definitions
//!
//! Categorized by source: config / ingestion / channel / report

use thiserror::Error;

use crate::PayloadKind;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Ingestion Errors =====
    /// Data source cannot be opened or decoded at all
    #[error("source '{source_name}' unreadable: {message}")]
    SourceUnreadable {
        source_name: String,
        message: String,
    },

    // ===== Channel Errors =====
    /// A channel send operation failed
    #[error("channel '{channel}' failed to send {kind} to '{recipient_id}': {message}")]
    ChannelSend {
        channel: String,
        recipient_id: String,
        kind: PayloadKind,
        message: String,
    },

    /// Channel transport is not connected
    #[error("channel '{channel}' connection error: {message}")]
    ChannelConnection { channel: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create source unreadable error
    pub fn source_unreadable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnreadable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create channel send error
    pub fn channel_send(
        channel: impl Into<String>,
        recipient_id: impl Into<String>,
        kind: PayloadKind,
        message: impl Into<String>,
    ) -> Self {
        Self::ChannelSend {
            channel: channel.into(),
            recipient_id: recipient_id.into(),
            kind,
            message: message.into(),
        }
    }

    /// Create channel connection error
    pub fn channel_connection(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ChannelConnection {
            channel: channel.into(),
            message: message.into(),
        }
    }
}
