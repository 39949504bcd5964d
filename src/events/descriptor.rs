//! Event descriptors and action metadata.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EventResult;
use crate::events::{BoxedEvent, Event};

/// Marks an event as invocable over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActionSpec {
    /// Action name; the route path is derived from it when `path` is unset.
    pub name: String,

    /// Explicit route path, relative to the root.
    #[serde(default)]
    pub path: Option<String>,
}

impl ActionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// A statically typed event known to the host framework.
pub trait EventType: Event + Sized {
    /// Registry name, unique per registry.
    const NAME: &'static str;

    /// Action metadata; `None` keeps the event off the HTTP surface.
    fn action() -> Option<ActionSpec> {
        None
    }

    /// Build and validate the event from a decoded request body.
    fn from_payload(payload: Value) -> EventResult<Self>;
}

type Constructor = dyn Fn(Value) -> EventResult<BoxedEvent> + Send + Sync;

/// Type-erased description of one registered event.
#[derive(Clone)]
pub struct EventDescriptor {
    name: String,
    action: Option<ActionSpec>,
    construct: Arc<Constructor>,
}

impl EventDescriptor {
    /// Describe an event by name with a custom constructor.
    pub fn new<F>(name: impl Into<String>, construct: F) -> Self
    where
        F: Fn(Value) -> EventResult<BoxedEvent> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: None,
            construct: Arc::new(construct),
        }
    }

    /// Describe a statically typed event.
    pub fn of<E: EventType>() -> Self {
        Self {
            name: E::NAME.to_string(),
            action: E::action(),
            construct: Arc::new(|payload| E::from_payload(payload).map(|e| Box::new(e) as BoxedEvent)),
        }
    }

    pub fn with_action(mut self, action: ActionSpec) -> Self {
        self.action = Some(action);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action(&self) -> Option<&ActionSpec> {
        self.action.as_ref()
    }

    /// Construct an event instance from a request payload.
    pub fn construct(&self, payload: Value) -> EventResult<BoxedEvent> {
        (self.construct)(payload)
    }
}

impl fmt::Debug for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDescriptor")
            .field("name", &self.name)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}
