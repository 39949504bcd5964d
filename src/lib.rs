//! REST interface for an event-processing service.
//!
//! Inspects an [`EventRegistry`](events::EventRegistry) once at startup and
//! publishes every action-bearing event as a `POST` endpoint. Requests are
//! correlated, decoded, turned into events, handed to an
//! [`EventProcessor`](events::EventProcessor), and answered with a uniform
//! JSON envelope.

pub mod config;
pub mod error;
pub mod events;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServiceConfig;
pub use error::{ErrorKind, EventError, EventResult};
pub use events::{ActionSpec, Event, EventDescriptor, EventProcessor, EventRegistry, EventType};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
