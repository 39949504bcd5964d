//! Response envelopes and error normalization.
//!
//! # Responsibilities
//! - Define the success and error JSON envelopes
//! - Map any `EventError` to its HTTP status and client-safe message
//! - Log failures in full: `warn` for client faults, `error` otherwise
//!
//! # Design Decisions
//! - Server-fault details never reach the client
//! - Every failure is normalized exactly once, at the point it is rendered

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Span;

use crate::error::EventError;

/// Body of every successful action response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    pub result: T,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(result: T) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

/// Body of every failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Render a processor result.
pub fn success_response(result: Value) -> Response {
    (StatusCode::OK, Json(SuccessEnvelope::new(result))).into_response()
}

/// Log `err` under `span` and render it as an error envelope.
pub fn normalize_error(span: &Span, err: &EventError) -> Response {
    let status = err.status();
    if err.is_client_fault() {
        tracing::warn!(
            parent: span,
            status = status.as_u16(),
            error = %err,
            "request failed"
        );
    } else {
        tracing::error!(
            parent: span,
            status = status.as_u16(),
            error = %err,
            cause = ?std::error::Error::source(err),
            "request failed"
        );
    }
    (status, Json(ErrorEnvelope::new(err.client_message()))).into_response()
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        normalize_error(&Span::current(), &self)
    }
}

/// Panic hook for the catch-panic layer.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    EventError::internal(format!("handler panicked: {detail}")).into_response()
}
