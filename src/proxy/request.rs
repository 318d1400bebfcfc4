//! Request Parsing Module
//!
//! Tokenizes the client request line and resolves absolute-form request
//! targets into host, path, and port.

use crate::error::{ProxyError, Result};

// == Request Line ==
/// The three whitespace-delimited tokens of an HTTP request line.
#[derive(Debug, Clone)]
pub struct RequestLine {
    /// Request method, e.g. `GET`
    pub method: String,
    /// Request target as written by the client; doubles as the cache key
    pub uri: String,
    /// Protocol version token, e.g. `HTTP/1.1`
    pub version: String,
}

impl RequestLine {
    /// Parses a raw request line into its three tokens.
    ///
    /// Fewer than three tokens is a malformed request and earns the client
    /// a 400 response.
    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(method), Some(uri), Some(version)) => Ok(Self {
                method: method.to_string(),
                uri: uri.to_string(),
                version: version.to_string(),
            }),
            _ => Err(ProxyError::BadRequest(line.trim_end().to_string())),
        }
    }

    /// Whether the method is the retrieval verb, matched case-insensitively.
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

// == Request Target ==
/// Resolved origin coordinates of an absolute-form request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    /// Origin host name or address
    pub host: String,
    /// Origin port, kept as written (default `80`)
    pub port: String,
    /// Path to request from the origin (default `/`)
    pub path: String,
}

impl RequestTarget {
    /// Resolves an absolute-form `http://host[:port][/path]` target.
    ///
    /// Anything else, including origin-form paths and other schemes, fails
    /// and silently terminates the session.
    pub fn resolve(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("http://")
            .ok_or_else(|| ProxyError::InvalidTarget(uri.to_string()))?;

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => (host, port),
            None => (authority, "80"),
        };

        if host.is_empty() || port.parse::<u16>().is_err() {
            return Err(ProxyError::InvalidTarget(uri.to_string()));
        }

        Ok(Self {
            host: host.to_string(),
            port: port.to_string(),
            path: path.to_string(),
        })
    }

    /// The `host:port` address used for connecting and the Host header.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
