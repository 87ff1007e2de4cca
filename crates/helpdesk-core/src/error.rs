// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the helpdesk intake bot.

use thiserror::Error;

/// The primary error type used across all adapter traits and core operations.
#[derive(Debug, Error)]
pub enum HelpdeskError {
    /// Configuration errors (missing tokens, invalid header values, bad addresses).
    #[error("configuration error: {0}")]
    Config(String),

    /// Messaging platform errors (send failure, file download, closed inbound queue).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Mail transport errors (SMTP connect/auth/send, IMAP session failures).
    #[error("mail error: {message}")]
    Mail {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Ticketing system errors. `status` carries the HTTP status when the
    /// tracker answered at all.
    #[error("tracker error: {message}")]
    Tracker {
        message: String,
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Adapter health check failed.
    #[error("health check failed for {name}: {source}")]
    HealthCheckFailed {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HelpdeskError {
    /// Shorthand for a channel error without an underlying source.
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
            source: None,
        }
    }

    /// Returns `true` when the tracker reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Tracker { status: Some(404), .. })
    }
}
