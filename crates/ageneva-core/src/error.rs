//! Error types for ageneva-core
//!
//! Centralized error handling using `thiserror` for ergonomic error definitions.

use thiserror::Error;

/// Main error type for ageneva-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Strategy string does not follow the rule grammar
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    /// Action is unknown, has the wrong arity, a bad argument, or an
    /// illegal right branch
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Trigger protocol is anything other than HTTP
    #[error("unsupported trigger protocol: {0}")]
    UnsupportedProtocol(String),

    /// Request bytes cannot be parsed into a request
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// A write completed its headers without a usable Content-Length
    #[error("missing or invalid Content-Length header")]
    MissingContentLength,

    /// I/O error surfaced unchanged from the underlying transport
    #[error(transparent)]
    Transport(#[from] std::io::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid rule error
    pub fn invalid_rule(message: impl Into<String>) -> Self {
        Self::InvalidRule(message.into())
    }

    /// Create an invalid action error
    pub fn invalid_action(message: impl Into<String>) -> Self {
        Self::InvalidAction(message.into())
    }

    /// Create a malformed request error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest(message.into())
    }
}

// The connection adapter implements `std::io::Write`, so evaluation errors
// must cross the io::Error boundary without losing their kind. Transport
// errors pass through untouched.
impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Transport(e) => e,
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other),
        }
    }
}
