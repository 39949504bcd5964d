//! JSON body decoding and body-fault interception.
//!
//! # Responsibilities
//! - Buffer the request body up to the configured limit
//! - Parse JSON bodies (strict: object or array at the top level)
//! - Hand the decoded value to handlers as a [`JsonBody`] extension
//! - Reclassify decoding faults as client faults and normalize them
//!
//! # Design Decisions
//! - Runs for every request, before routing decides anything
//! - Non-JSON content types and empty bodies decode to `{}`

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use thiserror::Error;

use crate::error::{ErrorKind, EventError};
use crate::http::request::RequestContext;
use crate::http::response::normalize_error;
use crate::http::server::AppState;

/// Decoded request body, as seen by action handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

/// Faults raised while decoding a request body.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("invalid JSON body: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("invalid JSON body: top-level value must be an object or array")]
    NotStrict,

    #[error("request entity too large: limit is {limit} bytes")]
    TooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    Read(axum::Error),
}

impl BodyError {
    /// Every body fault is a client fault.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BodyError::TooLarge { .. } => ErrorKind::PayloadTooLarge,
            _ => ErrorKind::BadRequest,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }
}

impl From<BodyError> for EventError {
    fn from(err: BodyError) -> Self {
        EventError::new(err.kind(), err.to_string()).with_source(err)
    }
}

/// Middleware decoding JSON bodies ahead of routing.
pub async fn decode_json_body(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();

    let (mut parts, body) = request.into_parts();
    let decoded = if is_json(&parts.headers) {
        match read_limited(&parts.headers, body, state.max_body_bytes).await {
            Ok(bytes) => parse_strict(&bytes).map(|value| (value, Body::from(bytes))),
            Err(err) => Err(err),
        }
    } else {
        Ok((Value::Object(Default::default()), body))
    };

    match decoded {
        Ok((value, body)) => {
            parts.extensions.insert(JsonBody(value));
            next.run(Request::from_parts(parts, body)).await
        }
        Err(err) => normalize_error(ctx.span(), &EventError::from(err)),
    }
}

/// `application/json`, plus structured-syntax `application/*+json` types,
/// which a stock `json()` body parser would leave undecoded.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Display text of the length-limit fault raised by `axum::body::to_bytes`.
const LENGTH_LIMIT_EXCEEDED: &str = "length limit exceeded";

async fn read_limited(headers: &HeaderMap, body: Body, limit: usize) -> Result<Bytes, BodyError> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > limit) {
        return Err(BodyError::TooLarge { limit });
    }

    axum::body::to_bytes(body, limit).await.map_err(|err| {
        if exceeded_limit(&err) {
            BodyError::TooLarge { limit }
        } else {
            BodyError::Read(err)
        }
    })
}

fn exceeded_limit(err: &axum::Error) -> bool {
    std::iter::successors(Some(err as &(dyn std::error::Error + 'static)), |e| e.source())
        .any(|e| e.to_string() == LENGTH_LIMIT_EXCEEDED)
}

fn parse_strict(bytes: &[u8]) -> Result<Value, BodyError> {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        None => Ok(Value::Object(Default::default())),
        Some(b'{') | Some(b'[') => Ok(serde_json::from_slice(bytes)?),
        Some(_) => Err(BodyError::NotStrict),
    }
}
