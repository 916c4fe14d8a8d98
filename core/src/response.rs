//! Response parser: raw byte stream in, structured [`Response`] out.
//!
//! # Design
//! The peer was asked for `Connection: close`, so the whole response is read
//! until end-of-stream and parsed afterwards. Every line is re-terminated with
//! `\r\n`, including one empty line for the end-of-stream read itself; the
//! body therefore sits between the first blank line and the final four bytes.
//!
//! The stream is kept as bytes end to end. Only the head is decoded as text;
//! the body may be binary and is exposed as text through [`Response::text`].
//!
//! Parsing never fails. An unreadable status line becomes 500, an unreadable
//! `Content-Length` becomes 0, and header or cookie entries without a
//! separator are skipped.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read};
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::Error;

/// Status reported when the status line cannot be read.
pub const FALLBACK_STATUS: u16 = 500;

const LINE_END: &[u8] = b"\r\n";
const HEAD_END: &[u8] = b"\r\n\r\n";

static STATUS_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{3}").expect("status pattern is valid"));

/// One parsed exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// Pairs from the `Set-Cookie` header; empty if there was none.
    pub cookies: BTreeMap<String, String>,
    pub content_type: String,
    pub content_length: u64,
    pub body: Vec<u8>,
    /// Everything read from the stream, kept for diagnostics.
    pub origin: Vec<u8>,
}

impl Response {
    /// Parse an accumulated response buffer.
    pub fn parse(origin: Vec<u8>) -> Self {
        let (head, body) = split_head(&origin);
        let head = String::from_utf8_lossy(head);

        let mut response = Response {
            status_code: parse_status_code(&head),
            headers: parse_headers(&head),
            body: body.to_vec(),
            ..Default::default()
        };
        response.cookies = response
            .header("Set-Cookie")
            .map(parse_cookies)
            .unwrap_or_default();
        response.content_type = response
            .header("Content-Type")
            .unwrap_or_default()
            .to_string();
        response.content_length = response
            .header("Content-Length")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0);
        response.origin = origin;
        response
    }

    /// Header value by name. Exact matches win; otherwise the first name that
    /// matches ignoring ASCII case is used.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self.status_code, 301 | 302)
    }

    /// Trimmed `Location` header, if present and non-empty.
    pub fn location(&self) -> Option<&str> {
        self.header("Location")
            .map(str::trim)
            .filter(|location| !location.is_empty())
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> Result<&str, Error> {
        std::str::from_utf8(&self.body).map_err(Error::Utf8)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        if self.body.is_empty() {
            return Err(Error::EmptyBody);
        }
        serde_json::from_slice(&self.body).map_err(Error::Deserialization)
    }
}

/// Read `reader` until end-of-stream and parse what arrived.
///
/// `address` only labels I/O errors.
pub fn read<R: Read>(reader: R, address: &str) -> Result<Response, Error> {
    let mut reader = BufReader::new(reader);
    let mut buffer = Vec::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .map_err(|e| Error::io(address, e))?;
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        buffer.extend_from_slice(&line);
        buffer.extend_from_slice(LINE_END);
        if n == 0 {
            break;
        }
    }

    debug!(
        "response protocol from {address}: {}",
        String::from_utf8_lossy(&buffer)
    );
    Ok(Response::parse(buffer))
}

/// Split a buffer into head and body.
///
/// Without a blank line the whole buffer is head. The body excludes the
/// trailing terminators added while reading; if that leaves nothing, or the
/// range would be inverted, the body is empty.
fn split_head(origin: &[u8]) -> (&[u8], &[u8]) {
    let Some(head_end) = origin
        .windows(HEAD_END.len())
        .position(|window| window == HEAD_END)
    else {
        let mut head = origin;
        while let Some(rest) = head.strip_suffix(LINE_END) {
            head = rest;
        }
        return (head, &[]);
    };
    let start = head_end + HEAD_END.len();
    let end = origin.len().saturating_sub(HEAD_END.len());
    let body: &[u8] = if end > start { &origin[start..end] } else { &[] };
    (&origin[..head_end], body)
}

/// First three-digit run on the status line, or [`FALLBACK_STATUS`].
pub fn parse_status_code(head: &str) -> u16 {
    let status_line = head.split("\r\n").next().unwrap_or_default();
    STATUS_CODE
        .find(status_line)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(FALLBACK_STATUS)
}

/// Header lines after the status line, split on the first `": "`.
pub fn parse_headers(head: &str) -> BTreeMap<String, String> {
    head.split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(": "))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// `name=value` pairs from a single `Set-Cookie` value. Pairs are separated
/// by `;` with optional spaces; a pair without `=` is skipped.
pub fn parse_cookies(value: &str) -> BTreeMap<String, String> {
    value
        .split(';')
        .map(str::trim_start)
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
