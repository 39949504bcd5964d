//! Error taxonomy shared by event construction, event processing and the
//! HTTP pipeline.
//!
//! # Classification
//! - Client faults (status in `400..500`): the message is safe to show.
//! - Server faults (status >= 500, or anything unclassified): the message is
//!   logged but replaced by `safe_message` or a fixed string on the wire.

use axum::http::StatusCode;
use thiserror::Error;

/// Message returned to clients for server faults without a `safe_message`.
pub const GENERIC_SERVER_MESSAGE: &str = "unexpected server error";

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Kind of failure, each mapping to one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    Conflict,
    PayloadTooLarge,
    Internal,
    Unavailable,
    /// A status declared by the event processor that has no dedicated kind.
    Status(StatusCode),
}

impl ErrorKind {
    /// HTTP status for this kind.
    ///
    /// Declared statuses below 400 are not errors and count as unclassified.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Status(code) if code.as_u16() >= 400 => code,
            ErrorKind::Status(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failure raised while constructing or processing an event.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EventError {
    kind: ErrorKind,
    message: String,
    safe_message: Option<String>,
    #[source]
    source: Option<BoxError>,
}

impl EventError {
    /// Create an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            safe_message: None,
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// Event payload failed the event's own validation.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    /// Create an error carrying an explicit HTTP status.
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Status(status), message)
    }

    /// Wrap an arbitrary error as an unclassified server fault.
    pub fn unexpected<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind: ErrorKind::Internal,
            message: err.to_string(),
            safe_message: None,
            source: Some(Box::new(err)),
        }
    }

    /// Message shown to clients instead of the generic one for server faults.
    pub fn with_safe_message(mut self, safe_message: impl Into<String>) -> Self {
        self.safe_message = Some(safe_message.into());
        self
    }

    /// Attach the underlying cause, kept for server-side logs only.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// Full internal message.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_client_fault(&self) -> bool {
        self.status().is_client_error()
    }

    /// The message that may leave the process.
    pub fn client_message(&self) -> &str {
        if self.is_client_fault() {
            &self.message
        } else {
            self.safe_message.as_deref().unwrap_or(GENERIC_SERVER_MESSAGE)
        }
    }
}

/// Result type for event construction and processing.
pub type EventResult<T> = Result<T, EventError>;
