//! Error types for kvfmt
//!
//! Two layers of failure:
//! - [`KvError`]: infrastructure errors (I/O, malformed wire data, config)
//! - [`DecodeError`]: the typed failure half of a [`Decoded`] reply

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Outcome of converting a reply into a statically requested type
pub type Decoded<T> = std::result::Result<T, DecodeError>;

/// Unified error type for transport, codec and configuration failures
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Wire Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Transport error: {0}")]
    Transport(String),

    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    #[error("{command}: expected {expected} arguments, got {actual}")]
    Arity {
        command: String,
        expected: usize,
        actual: usize,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a reply could not be turned into the requested value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Transport failure, unsupported conversion or malformed composite shape
    #[error("reply not convertible")]
    Failed,

    /// The store answered with nil (key or field does not exist)
    #[error("reply was nil")]
    Nil,

    /// The store rejected the command; carries the server's error text
    #[error("server error: {0}")]
    Server(String),
}

impl DecodeError {
    /// Numeric failure code, compatible with the store client library's
    /// reply-type constants (`-1` generic, `4` nil, `6` error)
    pub fn code(&self) -> i32 {
        match self {
            DecodeError::Failed => -1,
            DecodeError::Nil => 4,
            DecodeError::Server(_) => 6,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, DecodeError::Nil)
    }
}
