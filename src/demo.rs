//! Built-in registry used when the binary runs standalone.

use std::any::Any;

use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use event_rest::events::{BoxedEvent, RegistryError};
use event_rest::{ActionSpec, Event, EventError, EventRegistry, EventResult, EventType};

/// Echoes a message back; exposed as `POST /ping`.
#[derive(Debug)]
pub struct Ping {
    id: Uuid,
    message: String,
}

#[derive(Deserialize)]
struct PingPayload {
    #[serde(default = "default_message")]
    message: String,
}

fn default_message() -> String {
    "pong".to_string()
}

impl Event for Ping {
    fn id(&self) -> Uuid {
        self.id
    }

    fn event_type(&self) -> &str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl EventType for Ping {
    const NAME: &'static str = "Ping";

    fn action() -> Option<ActionSpec> {
        Some(ActionSpec::new("ping"))
    }

    fn from_payload(payload: Value) -> EventResult<Self> {
        let payload: PingPayload =
            serde_json::from_value(payload).map_err(|e| EventError::validation(e.to_string()))?;
        Ok(Self {
            id: Uuid::new_v4(),
            message: payload.message,
        })
    }
}

/// Internal event with no HTTP exposure.
#[derive(Debug)]
pub struct Heartbeat {
    id: Uuid,
}

impl Event for Heartbeat {
    fn id(&self) -> Uuid {
        self.id
    }

    fn event_type(&self) -> &str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl EventType for Heartbeat {
    const NAME: &'static str = "Heartbeat";

    fn from_payload(_payload: Value) -> EventResult<Self> {
        Ok(Self { id: Uuid::new_v4() })
    }
}

pub fn registry() -> Result<EventRegistry, RegistryError> {
    let mut registry = EventRegistry::new();
    registry.register::<Ping>()?.register::<Heartbeat>()?;
    Ok(registry)
}

pub async fn process_event(event: BoxedEvent) -> EventResult<Value> {
    match event.downcast_ref::<Ping>() {
        Some(ping) => Ok(json!({ "eventId": ping.id, "reply": ping.message })),
        None => Err(EventError::not_found(format!(
            "no processor for event {}",
            event.event_type()
        ))),
    }
}
