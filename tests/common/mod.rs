//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::any::Any;
use std::io;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;
use uuid::Uuid;

use event_rest::events::BoxedEvent;
use event_rest::health::{AlwaysHealthy, HealthProbe};
use event_rest::http::{create_app, AppState};
use event_rest::{ActionSpec, Event, EventError, EventRegistry, EventResult, EventType};

/// `POST /create-order`: requires a sku and a positive quantity.
#[derive(Debug)]
pub struct CreateOrder {
    pub id: Uuid,
    pub sku: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
struct CreateOrderPayload {
    sku: String,
    quantity: u32,
}

impl Event for CreateOrder {
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

impl EventType for CreateOrder {
    const NAME: &'static str = "CreateOrder";

    fn action() -> Option<ActionSpec> {
        Some(ActionSpec::new("createOrder"))
    }

    fn from_payload(payload: Value) -> EventResult<Self> {
        let payload: CreateOrderPayload =
            serde_json::from_value(payload).map_err(|e| EventError::validation(e.to_string()))?;
        if payload.quantity == 0 {
            return Err(EventError::validation("quantity must be positive"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            sku: payload.sku,
            quantity: payload.quantity,
        })
    }
}

/// `POST /custom`: `outcome` selects how the processor answers.
#[derive(Debug)]
pub struct CancelOrder {
    pub id: Uuid,
    pub outcome: String,
}

impl Event for CancelOrder {
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

impl EventType for CancelOrder {
    const NAME: &'static str = "CancelOrder";

    fn action() -> Option<ActionSpec> {
        Some(ActionSpec::new("cancelOrder").with_path("custom"))
    }

    fn from_payload(payload: Value) -> EventResult<Self> {
        let outcome = payload
            .get("outcome")
            .and_then(Value::as_str)
            .unwrap_or("ok")
            .to_string();
        Ok(Self {
            id: Uuid::new_v4(),
            outcome,
        })
    }
}

/// Internal event; never exposed.
#[derive(Debug)]
pub struct AuditTrail {
    pub id: Uuid,
}

impl Event for AuditTrail {
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

impl EventType for AuditTrail {
    const NAME: &'static str = "AuditTrail";

    fn from_payload(_payload: Value) -> EventResult<Self> {
        Ok(Self { id: Uuid::new_v4() })
    }
}

pub fn registry() -> EventRegistry {
    let mut registry = EventRegistry::new();
    registry
        .register::<AuditTrail>()
        .unwrap()
        .register::<CreateOrder>()
        .unwrap()
        .register::<CancelOrder>()
        .unwrap();
    registry
}

/// Processor standing in for the real domain logic.
pub async fn process(event: BoxedEvent) -> EventResult<Value> {
    if let Some(order) = event.downcast_ref::<CreateOrder>() {
        return Ok(json!({ "orderId": order.id, "sku": order.sku, "quantity": order.quantity }));
    }
    if let Some(cancel) = event.downcast_ref::<CancelOrder>() {
        return match cancel.outcome.as_str() {
            "missing" => Err(EventError::not_found("order 17 does not exist")),
            "boom" => Err(EventError::unexpected(io::Error::new(
                io::ErrorKind::Other,
                "db password=hunter2 rejected",
            ))),
            "busy" => Err(EventError::unavailable("ledger offline").with_safe_message("try again shortly")),
            "panic" => panic!("processor exploded"),
            _ => Ok(json!({ "cancelled": true })),
        };
    }
    Err(EventError::internal("unexpected event"))
}

pub fn app() -> Router {
    app_with(AlwaysHealthy, 100 * 1024)
}

pub fn app_with<H: HealthProbe>(probe: H, max_body_bytes: usize) -> Router {
    let state = AppState::new(Arc::new(probe), max_body_bytes);
    create_app(&registry(), Arc::new(process), state).unwrap()
}

pub fn post_json(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

/// Send one request through the router and decode the JSON response.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, headers, body)
}

/// In-memory sink for JSON log lines.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Every captured record, parsed.
    pub fn records(&self) -> Vec<Value> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).expect("log line should be JSON"))
            .collect()
    }

    /// Records whose message equals `message`.
    pub fn with_message(&self, message: &str) -> Vec<Value> {
        self.records()
            .into_iter()
            .filter(|r| r["fields"]["message"] == message)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route all tracing output on this thread into a fresh capture.
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(capture.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}
