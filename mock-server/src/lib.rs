//! Stub HTTP peer for exercising the raw client end to end.
//!
//! Routes:
//! - `/echo` (any method): replies with the request body and content type.
//! - `/inspect` (any method): JSON summary of method, URI, headers and body.
//! - `/login`: sets a `session` cookie.
//! - `/status/{code}`: replies with that status.
//! - `/hops/{n}` (any method): the first `n` hits redirect back to this same
//!   server, the next one answers with the method, body and hit count. The
//!   counter is per server.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What `/inspect` saw.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inspection {
    pub method: String,
    pub uri: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// What `/hops/{n}` answers once the chain ends.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HopReport {
    pub method: String,
    pub body: String,
    pub hits: u32,
}

#[derive(Clone)]
pub struct AppState {
    /// Address redirects point at, `http://host:port`.
    pub origin: String,
    pub hits: Arc<AtomicU32>,
}

pub fn app(origin: impl Into<String>) -> Router {
    let state = AppState {
        origin: origin.into(),
        hits: Arc::new(AtomicU32::new(0)),
    };
    Router::new()
        .route("/echo", any(echo))
        .route("/inspect", any(inspect))
        .route("/login", get(login))
        .route("/status/{code}", any(status))
        .route("/hops/{n}", any(hops))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    let addr: SocketAddr = listener.local_addr()?;
    info!("stub peer listening on {addr}");
    axum::serve(listener, app(format!("http://{addr}"))).await
}

async fn echo(headers: HeaderMap, body: String) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/plain")
        .to_string();
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn inspect(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Inspection> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect();
    Json(Inspection {
        method: method.to_string(),
        uri: uri.to_string(),
        headers,
        body,
    })
}

async fn login() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, "session=abc123; Path=/; HttpOnly")],
        "welcome",
    )
}

async fn status(Path(code): Path<u16>) -> Result<StatusCode, StatusCode> {
    StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)
}

async fn hops(
    State(state): State<AppState>,
    Path(n): Path<u32>,
    method: Method,
    body: Bytes,
) -> Response {
    let hits = state.hits.fetch_add(1, Ordering::SeqCst) + 1;
    if hits <= n {
        return (StatusCode::FOUND, [(header::LOCATION, format!("{}/", state.origin))]).into_response();
    }
    Json(HopReport {
        method: method.to_string(),
        body: String::from_utf8_lossy(&body).into_owned(),
        hits,
    })
    .into_response()
}
