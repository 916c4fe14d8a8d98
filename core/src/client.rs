//! Blocking HTTP/1.1 client over raw TCP or local stream sockets.
//!
//! # Design
//! `Client` owns a [`ClientState`] and a [`ClientConfig`]. Each call renders
//! the request, opens a fresh connection, writes it, reads until the peer
//! closes, and hands the parsed response to the redirect loop. The calling
//! thread is blocked for the whole chain.
//!
//! The only mutation a request performs on the state is committing where the
//! redirect chain ended: `address` becomes the last hop's address and
//! `redirect_count` the number of hops. Mutating calls take `&mut self`, so
//! sharing one client across threads needs external locking.

use log::debug;
use url::form_urlencoded;

use crate::body::Body;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::http::{Method, Target};
use crate::redirect::{self, RedirectContext};
use crate::request::{self, RequestIntent};
use crate::response::{self, Response};
use crate::state::ClientState;
use crate::transport;

#[derive(Debug, Clone)]
pub struct Client {
    state: ClientState,
    config: ClientConfig,
}

impl Client {
    pub fn new(state: ClientState, config: ClientConfig) -> Self {
        Self { state, config }
    }

    /// Client for `host` on TCP port 80.
    pub fn tcp(host: &str) -> Self {
        Self::new(ClientState::tcp(host), ClientConfig::default())
    }

    /// Client for the local stream socket at `path`.
    pub fn unix(path: impl Into<String>) -> Self {
        Self::new(ClientState::unix(path), ClientConfig::default())
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.state.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_cookie(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.state.cookies.insert(name.into(), value.into());
        self
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ClientState {
        &mut self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET route?query`. Query pairs are form-urlencoded in the given order.
    pub fn get(&mut self, route: &str, query: &[(&str, &str)]) -> Result<Response, Error> {
        let route = with_query(route, query);
        self.execute(Method::Get, &route, Body::Empty)
    }

    pub fn post(&mut self, route: &str, body: impl Into<Body>) -> Result<Response, Error> {
        self.execute(Method::Post, route, body)
    }

    pub fn put(&mut self, route: &str, body: impl Into<Body>) -> Result<Response, Error> {
        self.execute(Method::Put, route, body)
    }

    pub fn patch(&mut self, route: &str, body: impl Into<Body>) -> Result<Response, Error> {
        self.execute(Method::Patch, route, body)
    }

    pub fn delete(&mut self, route: &str) -> Result<Response, Error> {
        self.execute(Method::Delete, route, Body::Empty)
    }

    pub fn head(&mut self, route: &str) -> Result<Response, Error> {
        self.execute(Method::Head, route, Body::Empty)
    }

    pub fn options(&mut self, route: &str) -> Result<Response, Error> {
        self.execute(Method::Options, route, Body::Empty)
    }

    /// Send `method route` with `body`, following redirects.
    ///
    /// On success the state's `address` and `redirect_count` reflect the
    /// chain that produced the returned response. On error the state is left
    /// untouched.
    pub fn execute(
        &mut self,
        method: Method,
        route: &str,
        body: impl Into<Body>,
    ) -> Result<Response, Error> {
        let intent = RequestIntent::new(method, route, body);
        let start = RedirectContext::start(self.state.target());
        let followed = redirect::follow(start, &intent, self.config.max_redirects, |target, intent| {
            self.exchange(target, intent)
        })?;
        self.state.commit(followed.context);
        Ok(followed.response)
    }

    /// One request/response round trip on a fresh connection.
    fn exchange(&self, target: &Target, intent: &RequestIntent) -> Result<Response, Error> {
        let text = request::build(&self.state, target, intent);
        let connection = transport::send(target, &text, self.config.timeout)?;
        let response = response::read(connection, &target.address)?;
        debug!(
            "{} {} via {} -> {}",
            intent.method, intent.route, target.address, response.status_code
        );
        Ok(response)
    }
}

fn with_query(route: &str, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return route.to_string();
    }
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query)
        .finish();
    format!("{route}?{encoded}")
}
