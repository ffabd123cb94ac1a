//! `tiny_http` adapter.
//!
//! `tiny_http::Server::recv` blocks, so each accept (and the body read that
//! follows) runs on the blocking pool while the async side waits on it or on
//! the shutdown signal. Requests are handled one at a time.

use std::future::Future;
use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;

use crate::error::ApiError;
use crate::request::{ApiRequest, Method};
use crate::response::ApiResponse;
use crate::router::handle;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("accept task failed: {0}")]
    Accept(String),
}

/// Request bodies larger than this are refused unless the server is built
/// with [`HttpServer::with_body_limit`].
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

pub struct HttpServer {
    server: Arc<tiny_http::Server>,
    body_limit: usize,
}

/// A received request, or one answered with an error before routing.
enum Incoming {
    Api(tiny_http::Request, ApiRequest),
    Rejected(tiny_http::Request, ApiError),
}

impl HttpServer {
    /// Bind to `addr` (`host:port`; port 0 picks a free one).
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the address cannot be bound.
    pub fn bind(addr: &str) -> Result<Self, ServerError> {
        let server = tiny_http::Server::http(addr).map_err(|e| ServerError::Bind {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            server: Arc::new(server),
            body_limit: DEFAULT_BODY_LIMIT,
        })
    }

    /// Refuse request bodies over `limit` bytes with 413.
    #[must_use]
    pub const fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Accept` if the blocking accept task panics.
    pub async fn serve(self, state: AppState, shutdown: impl Future<Output = ()>) -> Result<(), ServerError> {
        tokio::pin!(shutdown);
        tracing::info!(addr = ?self.local_addr(), body_limit = self.body_limit, "listening");

        loop {
            let server = Arc::clone(&self.server);
            let limit = self.body_limit;
            let accept = tokio::task::spawn_blocking(move || receive(&server, limit));

            let incoming = tokio::select! {
                () = &mut shutdown => {
                    self.server.unblock();
                    tracing::info!("shutting down");
                    return Ok(());
                }
                joined = accept => joined.map_err(|e| ServerError::Accept(e.to_string()))?,
            };

            match incoming {
                Some(Incoming::Api(raw, req)) => {
                    let response = handle(&state, req).await;
                    respond(raw, &response);
                }
                Some(Incoming::Rejected(raw, err)) => respond(raw, &err.into_response()),
                None => {}
            }
        }
    }
}

/// Block for the next request and read its body, up to `limit` bytes.
fn receive(server: &tiny_http::Server, limit: usize) -> Option<Incoming> {
    let mut raw = match server.recv() {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "accept failed");
            return None;
        }
    };

    let Some(method) = Method::parse(raw.method().as_str()) else {
        return Some(Incoming::Rejected(raw, ApiError::RouteNotFound));
    };

    let mut req = ApiRequest::new(method, raw.url());
    for header in raw.headers() {
        req = req.with_header(header.field.as_str().as_str(), header.value.as_str());
    }

    let declared = raw.body_length();
    match read_body(raw.as_reader(), declared, limit) {
        Ok(body) => Some(Incoming::Api(raw, req.with_body(body))),
        Err(err) => {
            tracing::warn!(error = %err, path = %req.path, "request body rejected");
            Some(Incoming::Rejected(raw, err))
        }
    }
}

/// Read a request body of at most `limit` bytes.
///
/// A declared `Content-Length` over the limit is refused without reading.
fn read_body(reader: impl Read, declared: Option<usize>, limit: usize) -> Result<Vec<u8>, ApiError> {
    if declared.is_some_and(|len| len > limit) {
        return Err(ApiError::BodyTooLarge { limit });
    }
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut body = Vec::new();
    reader
        .take(cap)
        .read_to_end(&mut body)
        .map_err(|e| ApiError::UnreadableBody(e.to_string()))?;
    if body.len() > limit {
        return Err(ApiError::BodyTooLarge { limit });
    }
    Ok(body)
}

fn respond(raw: tiny_http::Request, response: &ApiResponse) {
    let mut out = tiny_http::Response::from_data(response.body_bytes()).with_status_code(response.status);
    let mut headers = response.headers.clone();
    if response.body.is_some() {
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
    }
    for (name, value) in &headers {
        match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => out.add_header(header),
            Err(()) => tracing::warn!(name, "dropped unencodable response header"),
        }
    }
    if let Err(e) = raw.respond(out) {
        tracing::warn!(error = %e, "failed to write response");
    }
}
