//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Proxy Error Enum ==
/// Unified error type for a relay session.
///
/// Only the first two variants produce a client-visible response (400 and
/// 501); every other failure terminates the session silently.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Request line had fewer than three tokens
    #[error("malformed request line: {0}")]
    BadRequest(String),

    /// Request method is not GET
    #[error("method not implemented: {0}")]
    NotImplemented(String),

    /// Request target could not be resolved into host/path/port
    #[error("invalid request target: {0}")]
    InvalidTarget(String),

    /// Origin server could not be reached
    #[error("origin connection failed: {0}")]
    OriginUnreachable(#[source] std::io::Error),

    /// I/O failure on the client or origin stream
    #[error("stream error: {0}")]
    Io(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the caching proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
