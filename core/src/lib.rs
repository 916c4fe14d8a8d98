//! Minimal HTTP/1.1 client speaking the protocol over raw byte streams.
//!
//! # Overview
//! Requests are rendered to literal HTTP/1.1 text, written to a fresh TCP or
//! local stream socket connection, and the response is read until the peer
//! closes (`Connection: close` is always sent). 301/302 responses are
//! followed by reissuing the same request against the `Location` address.
//!
//! # Design
//! - `template` and `request` turn a `RequestIntent` plus `ClientState` into
//!   wire text without touching the state.
//! - `transport` opens one blocking connection per exchange.
//! - `response` parses the raw stream with local fallbacks instead of errors.
//! - `redirect` threads a by-value `RedirectContext` through the hop loop;
//!   `Client` commits the final context into its state.
//!
//! Not supported: TLS, HTTP/2, chunked transfer-encoding, keep-alive,
//! compression and streaming bodies.

pub mod body;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod redirect;
pub mod request;
pub mod response;
pub mod state;
pub mod template;
pub mod transport;

pub use body::Body;
pub use client::Client;
pub use config::ClientConfig;
pub use error::Error;
pub use http::{Method, NetworkKind, Target};
pub use redirect::RedirectContext;
pub use request::RequestIntent;
pub use response::Response;
pub use state::ClientState;
