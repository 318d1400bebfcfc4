//! Header Rewrite Module
//!
//! Assembles the HTTP/1.0 request block sent to the origin: a synthesized
//! request line and fixed headers, followed by the client's pass-through
//! headers in their original order.

use crate::proxy::request::RequestTarget;

/// Fixed User-Agent presented to every origin.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:3.10.0) Gecko/20191101 Firefox/63.0.1";

/// Header lines replaced by synthesized equivalents.
///
/// Matching is a case-sensitive substring test on the raw line: a line
/// merely containing one of these words anywhere is dropped.
const DROPPED_SUBSTRINGS: [&str; 4] = ["Host", "Connection", "User-Agent", "Proxy-Connection"];

// == Drop Check ==
/// Whether a raw client header line is replaced rather than passed through.
pub fn is_dropped_line(line: &str) -> bool {
    DROPPED_SUBSTRINGS.iter().any(|name| line.contains(name))
}

// == Assemble ==
/// Builds the full outbound header block, terminator included.
///
/// The order is fixed: request line, Host, User-Agent, Connection,
/// Proxy-Connection, retained client headers, blank line. Origin servers
/// expecting well-formed HTTP/1.0 rely on this exact shape.
pub fn assemble_request(target: &RequestTarget, retained: &str) -> String {
    format!(
        "GET {} HTTP/1.0\r\n\
         Host: {}\r\n\
         User-Agent: {}\r\n\
         Connection: close\r\n\
         Proxy-Connection: close\r\n\
         {}\r\n",
        target.path,
        target.authority(),
        USER_AGENT,
        retained,
    )
}
