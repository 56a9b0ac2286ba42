//! Shared error types across Wozzit crates.

use std::time::Duration;

use thiserror::Error;

use crate::protocol::Envelope;

/// Envelope validation failure.
///
/// The `Display` text of each variant is the message carried in the
/// `wozzit.error` payload returned to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Body is not an object with a top-level `wozzit` key.
    #[error("Bad request")]
    BadRequest,
    #[error("No protocol")]
    NoProtocol,
    /// Protocol present but outside the supported range (or not a version triple).
    #[error("Unsupported protocol")]
    UnsupportedProtocol,
    #[error("No schema")]
    NoSchema,
    #[error("No version")]
    NoVersion,
}

impl ValidationError {
    /// HTTP-equivalent status code. Every validation failure is a client error.
    pub fn status(self) -> u16 {
        400
    }

    /// Contract message carried in the error payload.
    pub fn message(self) -> &'static str {
        match self {
            ValidationError::BadRequest => "Bad request",
            ValidationError::NoProtocol => "No protocol",
            ValidationError::UnsupportedProtocol => "Unsupported protocol",
            ValidationError::NoSchema => "No schema",
            ValidationError::NoVersion => "No version",
        }
    }

    /// Build the `wozzit.error` envelope answering this failure.
    pub fn to_envelope(self) -> Envelope {
        Envelope::error(self.status(), self.message())
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, WozzitError>;

/// Unified error type used by the node, its adapters, and config loading.
#[derive(Debug, Error)]
pub enum WozzitError {
    /// Config file unreadable, malformed, or failing validation.
    #[error("config error: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("invalid rule: {0}")]
    InvalidRule(String),
    /// Remote node answered with a non-200 status.
    #[error("remote returned status {0}")]
    Status(u16),
    #[error("unable to connect: {0}")]
    NoServer(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("smtp not configured")]
    SmtpNotConfigured,
    #[error("mail: {0}")]
    Mail(String),
    #[error("callback failed: {0}")]
    Callback(String),
    #[error("handler panicked: {0}")]
    Panicked(String),
    #[error("handler timed out after {0:?}")]
    Timeout(Duration),
    #[error("internal: {0}")]
    Internal(String),
}
