//! Redirect controller.
//!
//! # Design
//! The loop is a two-state machine. Each exchange either yields a terminal
//! response, which is returned unchanged, or a 301/302 that moves the
//! [`RedirectContext`] to the `Location` address. The context is passed by
//! value from hop to hop and handed back with the final response; the loop
//! never touches client state.
//!
//! Every hop reissues the original [`RequestIntent`]: method, route and body
//! are preserved, so a redirected POST is still a POST.

use log::{info, warn};
use url::Url;

use crate::error::Error;
use crate::http::{NetworkKind, Target};
use crate::request::RequestIntent;
use crate::response::Response;
use crate::state::DEFAULT_TCP_PORT;

/// Where the next hop goes and how many hops have been taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectContext {
    pub target: Target,
    pub hops: u32,
}

impl RedirectContext {
    pub fn start(target: Target) -> Self {
        Self { target, hops: 0 }
    }

    /// Context for the hop after a redirect to `location`.
    ///
    /// On TCP an absolute `http://` location is reduced to `host:port`, with
    /// port 80 when none is given. Anything else replaces the address
    /// verbatim.
    pub fn hop(self, location: &str) -> Self {
        let location = location.trim();
        let address = match self.target.network {
            NetworkKind::Tcp => tcp_address(location).unwrap_or_else(|| location.to_string()),
            NetworkKind::Unix => location.to_string(),
        };
        Self {
            target: Target::new(self.target.network, address),
            hops: self.hops + 1,
        }
    }
}

/// A terminal response together with the context it was received under.
#[derive(Debug)]
pub struct Followed {
    pub response: Response,
    pub context: RedirectContext,
}

/// Run `exchange` from `context` until a terminal response arrives.
///
/// Fails with [`Error::TooManyRedirects`] once the hop count would exceed
/// `max_redirects`; the request for that hop is never sent. A redirect
/// without a usable `Location` is treated as terminal.
pub fn follow<F>(
    mut context: RedirectContext,
    intent: &RequestIntent,
    max_redirects: u32,
    mut exchange: F,
) -> Result<Followed, Error>
where
    F: FnMut(&Target, &RequestIntent) -> Result<Response, Error>,
{
    loop {
        let response = exchange(&context.target, intent)?;
        if !response.is_redirect() {
            return Ok(Followed { response, context });
        }
        let Some(location) = response.location() else {
            warn!(
                "{} from {} without a Location header, not following",
                response.status_code, context.target.address
            );
            return Ok(Followed { response, context });
        };

        let next = context.hop(location);
        if next.hops > max_redirects {
            return Err(Error::TooManyRedirects { hops: next.hops });
        }
        info!(
            "following {} redirect {} for {} {} to {}",
            response.status_code, next.hops, intent.method, intent.route, next.target.address
        );
        context = next;
    }
}

fn tcp_address(location: &str) -> Option<String> {
    let url = Url::parse(location).ok()?;
    if url.scheme() != "http" {
        return None;
    }
    let host = url.host_str()?;
    let port = url.port().unwrap_or(DEFAULT_TCP_PORT);
    Some(format!("{host}:{port}"))
}
