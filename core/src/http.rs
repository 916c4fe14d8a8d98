//! Protocol vocabulary shared by the builder, transport and redirect loop.
//!
//! # Design
//! These are plain data types. `Method` knows which verbs carry a body on the
//! wire, and `Target` pairs a network kind with an address so the transport
//! and the `Host` header derive from the same value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    /// Whether requests with this method carry `Content-Length` and a body.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of byte-stream connection the client dials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    /// Plaintext TCP; the address is `host:port`.
    Tcp,
    /// Local stream socket; the address is a filesystem path.
    Unix,
}

/// Where a single exchange is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub network: NetworkKind,
    pub address: String,
}

impl Target {
    pub fn new(network: NetworkKind, address: impl Into<String>) -> Self {
        Self {
            network,
            address: address.into(),
        }
    }

    /// Value of the `Host` request header.
    ///
    /// Local sockets have no meaningful host, so servers behind them see
    /// `localhost`.
    pub fn host(&self) -> &str {
        match self.network {
            NetworkKind::Tcp => &self.address,
            NetworkKind::Unix => "localhost",
        }
    }
}
