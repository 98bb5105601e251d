//! Common error types for the farming advisory workspace

use thiserror::Error;

/// Common result type for advisory operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the resolver, the gateway and the service
///
/// Every variant is recoverable at the point of the triggering user action.
/// None of them is fatal to the process.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed user selection (empty month/crop, unknown month)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested crop (or other static record) is not in the knowledge base
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network, HTTP or parse failure from the external prediction service,
    /// including an explicit `error` field in an otherwise successful response
    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    /// Host environment lacks a required capability (speech synthesis)
    #[error("Unsupported capability: {0}")]
    UnsupportedCapability(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Message suitable for the dedicated error region of the calling flow
    ///
    /// Strips the variant prefix so the text reads as a sentence to the user.
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidInput(msg)
            | Error::NotFound(msg)
            | Error::UpstreamFailure(msg)
            | Error::UnsupportedCapability(msg)
            | Error::Config(msg)
            | Error::Internal(msg) => msg.clone(),
            Error::Io(err) => err.to_string(),
        }
    }
}
