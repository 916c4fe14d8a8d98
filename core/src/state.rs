//! Per-client mutable record.
//!
//! # Design
//! `ClientState` is owned by the caller. Headers and cookies are set before a
//! request is issued and are only read by the request builder. After every
//! completed exchange the client commits the final redirect context back into
//! `address` and `redirect_count`, so a client that was redirected keeps
//! talking to the address it ended up at. Nothing else mutates the state.
//!
//! Headers and cookies live in ordered maps, which makes the rendered header
//! block sorted by name.

use std::collections::BTreeMap;

use crate::http::{NetworkKind, Target};
use crate::redirect::RedirectContext;

/// Port appended by [`ClientState::tcp`].
pub const DEFAULT_TCP_PORT: u16 = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    pub network: NetworkKind,
    pub address: String,
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
    /// Hops taken by the most recent exchange.
    pub redirect_count: u32,
}

impl ClientState {
    pub fn new(network: NetworkKind, address: impl Into<String>) -> Self {
        Self {
            network,
            address: address.into(),
            headers: BTreeMap::new(),
            cookies: BTreeMap::new(),
            redirect_count: 0,
        }
    }

    /// Plaintext TCP to `host` on port 80.
    pub fn tcp(host: &str) -> Self {
        Self::new(NetworkKind::Tcp, format!("{host}:{DEFAULT_TCP_PORT}"))
    }

    /// Local stream socket at `path`.
    pub fn unix(path: impl Into<String>) -> Self {
        Self::new(NetworkKind::Unix, path)
    }

    pub fn target(&self) -> Target {
        Target::new(self.network, self.address.clone())
    }

    /// Record where a redirect chain ended and how many hops it took.
    pub(crate) fn commit(&mut self, context: RedirectContext) {
        self.network = context.target.network;
        self.address = context.target.address;
        self.redirect_count = context.hops;
    }
}
