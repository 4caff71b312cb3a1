//! # HTTP Transport
//!
//! Exposes a [`Simulator`] over HTTP with axum. Every method and path reaches
//! the same handler:
//!
//! - `GET` invokes with an empty object body
//! - other methods parse the request body as JSON, falling back to `{}`
//! - repeated request headers are joined with `", "`
//!
//! The envelope's status, headers and JSON body become the HTTP response.

use crate::{Handler, Headers, ResponseEnvelope, Simulator, Transform};
use axum::{
    Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::Response,
};
use serde_json::{Map, Value};
use std::{
    net::{AddrParseError, Ipv4Addr, SocketAddr},
    sync::Arc,
};
use thiserror::Error;
use tokio::net::TcpListener;

/// Environment variable overriding [`ServerConfig::addr`].
pub const ADDR_ENV: &str = "LAMBDASIM_ADDR";

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 3000;

/// Errors raised by the HTTP transport. Handler failures never show up here.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The requested address.
        addr: SocketAddr,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// The configured address could not be parsed.
    #[error("invalid listen address `{value}`: {source}")]
    InvalidAddr {
        /// The configured value.
        value: String,
        /// Why it did not parse.
        #[source]
        source: AddrParseError,
    },
}

/// Where the HTTP transport listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `LAMBDASIM_ADDR`.
    pub fn from_env() -> Result<Self, TransportError> {
        match std::env::var(ADDR_ENV) {
            Ok(value) if !value.is_empty() => Self::parse(&value),
            _ => Ok(Self::default()),
        }
    }

    /// Parse a `host:port` listen address.
    pub fn parse(value: &str) -> Result<Self, TransportError> {
        let addr = value
            .parse()
            .map_err(|source| TransportError::InvalidAddr {
                value: value.to_string(),
                source,
            })?;
        Ok(Self { addr })
    }
}

/// Build an axum router dispatching every request to `simulator`.
pub fn router<H: Handler, T: Transform>(simulator: Arc<Simulator<H, T>>) -> Router {
    Router::new()
        .fallback(dispatch::<H, T>)
        .with_state(simulator)
}

/// Serve `simulator` until the listener fails.
pub async fn serve<H: Handler, T: Transform>(
    simulator: Simulator<H, T>,
    config: ServerConfig,
) -> Result<(), TransportError> {
    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|source| TransportError::Bind {
            addr: config.addr,
            source,
        })?;
    tracing::info!(addr = %config.addr, "simulator listening");

    axum::serve(listener, router(Arc::new(simulator)))
        .await
        .map_err(TransportError::Serve)
}

async fn dispatch<H: Handler, T: Transform>(
    State(simulator): State<Arc<Simulator<H, T>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = if method == Method::GET {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|error| {
            if !body.is_empty() {
                tracing::debug!(%error, "request body is not JSON, invoking with {{}}");
            }
            Value::Object(Map::new())
        })
    };
    let url = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |target| target.as_str());

    let envelope = simulator
        .invoke(method.as_str(), url, body, join_headers(&headers))
        .await;
    into_response(envelope)
}

fn join_headers(headers: &HeaderMap) -> Headers {
    let mut joined = Headers::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            tracing::warn!(header = %name, "skipping non-ASCII request header");
            continue;
        };
        joined
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    joined
}

fn into_response(envelope: ResponseEnvelope) -> Response {
    let status_code = envelope.status_code();

    let payload = match envelope.body() {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let mut response = Response::new(payload);

    *response.status_mut() = StatusCode::from_u16(status_code).unwrap_or_else(|_| {
        tracing::warn!(status_code, "envelope status is not a valid HTTP status");
        StatusCode::BAD_GATEWAY
    });

    let fields = response.headers_mut();
    for (name, value) in envelope.headers() {
        match envelope.multi_value_headers().get(name) {
            Some(values) => {
                for value in values {
                    append_header(fields, name, value);
                }
            }
            None => append_header(fields, name, value),
        }
    }
    response
}

/// Add one header field. Names are unique in the envelope's header map, so
/// appending only repeats a name for multi-value headers.
fn append_header(fields: &mut HeaderMap, name: &str, value: &str) {
    match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
        (Ok(name), Ok(value)) => {
            fields.append(name, value);
        }
        _ => tracing::warn!(header = %name, "skipping header not representable in HTTP"),
    }
}
