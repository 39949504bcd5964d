//! Request correlation.
//!
//! # Responsibilities
//! - Generate a fresh request ID (UUID v4) for every inbound request
//! - Create the request-scoped span every later log line hangs off
//! - Log one entry record and exactly one completion record per request
//! - Echo the request ID back in `x-request-id`
//!
//! # Design Decisions
//! - Incoming `x-request-id` headers are ignored; IDs are always generated here
//! - The context travels as a request extension and is passed explicitly to
//!   handlers, never stored on the response
//! - Elapsed time uses a monotonic clock, so durations are never negative
//! - Everything downstream runs in its own task, so in-flight processing
//!   outlives a disconnected client

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, MatchedPath, Request},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::error::EventError;
use crate::http::response::normalize_error;
use crate::observability::metrics;

/// Header carrying the generated request ID on responses.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Per-request state created at the start of the pipeline.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    span: Span,
    started: Instant,
}

impl RequestContext {
    pub fn new() -> Self {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("request", request_id = %request_id);
        Self {
            request_id,
            span,
            started: Instant::now(),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Span scoped to this request; parent of all request log records.
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Outermost middleware: correlates and logs every request.
pub async fn correlate(mut request: Request, next: Next) -> Response {
    let ctx = RequestContext::new();

    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    let forwarded = forwarded_for(request.headers());

    tracing::info!(
        parent: ctx.span(),
        ip = client_ip.as_deref().unwrap_or("-"),
        ips = ?forwarded,
        url = %request.uri(),
        method = %request.method(),
        headers = ?request.headers(),
        "handling request"
    );

    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    request.extensions_mut().insert(ctx.clone());

    // Runs detached from the connection: a client disconnect neither cancels
    // processing nor drops the completion record.
    let task = {
        let ctx = ctx.clone();
        let method = method.clone();
        let route = route.clone();
        tokio::spawn(async move {
            let response = next.run(request).instrument(ctx.span().clone()).await;
            complete(&ctx, &method, &route, &response);
            response
        })
    };

    let mut response = match task.await {
        Ok(response) => response,
        Err(err) => {
            let response = normalize_error(ctx.span(), &EventError::unexpected(err));
            complete(&ctx, &method, &route, &response);
            response
        }
    };

    if let Ok(value) = HeaderValue::from_str(&ctx.request_id().to_string()) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

/// Emit the completion record and request metrics.
fn complete(ctx: &RequestContext, method: &str, route: &str, response: &Response) {
    let elapsed = ctx.elapsed();
    let status = response.status().as_u16();
    tracing::info!(
        parent: ctx.span(),
        duration_ms = elapsed.as_millis() as u64,
        status_code = status,
        "request completed"
    );
    metrics::record_request(method, status, route, elapsed);
}

/// Client addresses from `X-Forwarded-For`, nearest proxy last.
fn forwarded_for(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
