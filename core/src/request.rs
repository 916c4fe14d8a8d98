//! Request builder: turns a request intent plus client state into wire text.
//!
//! # Design
//! The request line and fixed headers come from a small template filled by
//! [`crate::template::render`]. Line breaks inside the template are `\n` and
//! are converted to `\r\n` exactly once, after substitution. The payload is
//! appended after that conversion, so body bytes reach the wire untouched and
//! `Content-Length` always matches them.
//!
//! Default headers are computed per request from a copy of the caller's
//! headers; the client state itself is never modified here.

use std::borrow::Cow;
use std::collections::BTreeMap;

use log::debug;

use crate::body::Body;
use crate::http::{Method, Target};
use crate::state::ClientState;
use crate::template::{self, Fields};

pub const DEFAULT_CONTENT_TYPE: &str = "application/json;charset=UTF-8";
pub const DEFAULT_USER_AGENT: &str = concat!("native-http/", env!("CARGO_PKG_VERSION"));

const REQUEST_HEAD: &str = "{{ .Method }} {{ .Route }} HTTP/1.1
Host: {{ .Host }}
Connection: close
";

const BODY_HEAD: &str = "Content-Length: {{ .Length }}
Accept: */*
";

const HEADER_BLOCK: &str = "{{ .Headers }}
";

/// What the caller asked for. Stays the same across every redirect hop.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestIntent {
    pub method: Method,
    pub route: String,
    pub body: Body,
}

impl RequestIntent {
    pub fn new(method: Method, route: impl Into<String>, body: impl Into<Body>) -> Self {
        Self {
            method,
            route: route.into(),
            body: body.into(),
        }
    }
}

/// Computed fields for one rendering of the request template.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub method: Method,
    pub route: &'a str,
    pub host: &'a str,
    pub length: usize,
    pub headers: String,
    pub payload: String,
}

impl Fields for RenderContext<'_> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "Method" => Some(Cow::Borrowed(self.method.as_str())),
            "Route" => Some(Cow::Borrowed(self.route)),
            "Host" => Some(Cow::Borrowed(self.host)),
            "Length" => Some(Cow::Owned(self.length.to_string())),
            "Headers" => Some(Cow::Borrowed(&self.headers)),
            "Body" => Some(Cow::Borrowed(&self.payload)),
            _ => None,
        }
    }
}

impl RenderContext<'_> {
    /// Render the complete request, consuming the context.
    pub fn render(self) -> String {
        let mut head = String::from(REQUEST_HEAD);
        if self.method.has_body() {
            head.push_str(BODY_HEAD);
        }
        head.push_str(HEADER_BLOCK);

        let mut text = template::render(&head, &self).replace('\n', "\r\n");
        if self.method.has_body() {
            text.push_str(&self.payload);
        }
        text
    }
}

/// Render the wire text for `intent` sent to `target` with `state`'s headers
/// and cookies.
pub fn build(state: &ClientState, target: &Target, intent: &RequestIntent) -> String {
    let payload = intent.body.payload();
    let headers = effective_headers(state);

    let context = RenderContext {
        method: intent.method,
        route: &intent.route,
        host: target.host(),
        length: payload.len(),
        headers: header_block(&headers),
        payload,
    };
    let text = context.render();
    debug!("request protocol to {}: {}", target.address, text);
    text
}

/// Caller headers plus the defaults for anything the caller did not set.
///
/// Presence checks ignore ASCII case, so a caller-supplied `content-type`
/// suppresses the default `Content-Type`.
pub fn effective_headers(state: &ClientState) -> BTreeMap<String, String> {
    let mut headers = state.headers.clone();

    if !contains_header(&headers, "Content-Type") {
        headers.insert("Content-Type".into(), DEFAULT_CONTENT_TYPE.into());
    }
    if !contains_header(&headers, "User-Agent") {
        headers.insert("User-Agent".into(), DEFAULT_USER_AGENT.into());
    }
    if !contains_header(&headers, "Cookie") && !state.cookies.is_empty() {
        headers.insert("Cookie".into(), cookie_header(&state.cookies));
    }
    headers
}

/// Serialize cookies as `name=value; ` pairs, skipping empty names.
///
/// The trailing `"; "` is kept; servers accept it.
pub fn cookie_header(cookies: &BTreeMap<String, String>) -> String {
    cookies
        .iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| format!("{name}={value}; "))
        .collect()
}

fn header_block(headers: &BTreeMap<String, String>) -> String {
    headers
        .iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| format!("{name}: {value}\n"))
        .collect()
}

fn contains_header(headers: &BTreeMap<String, String>, name: &str) -> bool {
    headers.keys().any(|key| key.eq_ignore_ascii_case(name))
}
