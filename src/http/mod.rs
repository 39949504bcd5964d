//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, pipeline wiring)
//!     → request.rs (request ID, scoped span, entry/completion logs)
//!     → CORS policy
//!     → body.rs (JSON decoding, body-fault interception)
//!     → GET /health                    → health::handler
//!     → POST /<derived path>           → action.rs → event processor
//!     → response.rs (envelopes, error normalization)
//!     → Send to client
//! ```

pub mod action;
pub mod body;
pub mod request;
pub mod response;
pub mod server;

pub use body::{BodyError, JsonBody};
pub use request::{RequestContext, X_REQUEST_ID};
pub use response::{ErrorEnvelope, SuccessEnvelope};
pub use server::{create_app, AppState, HttpServer};
