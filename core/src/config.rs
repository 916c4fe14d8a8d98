//! Client tuning knobs.
//!
//! The core has no file, environment or CLI surface. `ClientConfig` derives
//! `Deserialize` so an embedding application can load it from its own config.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default bound on consecutive 301/302 hops.
pub const DEFAULT_MAX_REDIRECTS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Hops allowed before `Error::TooManyRedirects`.
    pub max_redirects: u32,
    /// Applied to connect, write and read. `None` blocks indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
