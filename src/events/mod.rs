//! Event model consumed by the REST interface.
//!
//! # Data Flow
//! ```text
//! Host framework (at startup):
//!     EventType impls
//!     → descriptor.rs (name, optional ActionSpec, constructor)
//!     → registry.rs (ordered, unique names, frozen)
//!     → handed to the route deriver
//!
//! Per request:
//!     JSON body → descriptor constructor → Box<dyn Event>
//!     → processor.rs (external async processing) → JSON result
//! ```
//!
//! # Design Decisions
//! - Descriptors are data, not reflection: the action tag is an `Option`
//! - Events are type-erased behind `dyn Event` once constructed
//! - Results are opaque `serde_json::Value`s

pub mod descriptor;
pub mod processor;
pub mod registry;

use std::any::Any;
use std::fmt;

use uuid::Uuid;

pub use descriptor::{ActionSpec, EventDescriptor, EventType};
pub use processor::{EventProcessor, ProcessFuture};
pub use registry::{EventRegistry, RegistryError};

/// A constructed, validated domain event.
pub trait Event: Any + Send + Sync + fmt::Debug {
    /// Unique identifier assigned at construction.
    fn id(&self) -> Uuid;

    /// Registered type name of the event.
    fn event_type(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

impl dyn Event {
    /// Downcast to a concrete event type.
    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Boxed event as handed to the processor.
pub type BoxedEvent = Box<dyn Event>;
