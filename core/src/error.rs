//! Error types for the raw HTTP client.
//!
//! # Design
//! Only failures the caller can act on are errors. A response that cannot be
//! parsed is never an error: the parser falls back to a 500 status, a zero
//! content length, or skips the offending header/cookie entry instead.

use std::io;

use thiserror::Error;

/// Errors returned by the client and its building blocks.
#[derive(Debug, Error)]
pub enum Error {
    /// The address could not be reached, or the request/response bytes could
    /// not be fully written or read.
    #[error("connection to {address} failed: {source}")]
    Connection {
        address: String,
        #[source]
        source: io::Error,
    },

    /// A caller-configured timeout elapsed during connect, write or read.
    #[error("timed out talking to {address}")]
    Timeout { address: String },

    /// The redirect chain exceeded the configured maximum number of hops.
    #[error("too many redirects ({hops} hops)")]
    TooManyRedirects { hops: u32 },

    /// A structured request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// `Response::json` was called on a response without a body.
    #[error("response body is empty")]
    EmptyBody,

    /// `Response::text` was called on a body that is not UTF-8.
    #[error("response body is not valid UTF-8: {0}")]
    Utf8(#[source] std::str::Utf8Error),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}

impl Error {
    /// Classify an I/O failure against `address`, separating socket timeouts
    /// from every other connection failure.
    pub(crate) fn io(address: &str, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Error::Timeout {
                address: address.to_string(),
            },
            _ => Error::Connection {
                address: address.to_string(),
                source,
            },
        }
    }
}
