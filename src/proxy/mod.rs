//! Proxy Module
//!
//! Per-connection relay protocol: request parsing, header rewriting, and the
//! session state machine that streams origin responses to clients while
//! mirroring them into the cache.

pub mod headers;
pub mod request;
pub mod session;

pub use request::{RequestLine, RequestTarget};
pub use session::handle_connection;
