//! Boundary to the external event processor.

use std::future::Future;

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::error::EventResult;
use crate::events::BoxedEvent;

/// Future returned by an event processor.
pub type ProcessFuture = BoxFuture<'static, EventResult<Value>>;

/// Executes a validated event and yields its domain result.
///
/// Implemented for any `Fn(BoxedEvent) -> Future` closure, so hosts can pass
/// an async function directly.
pub trait EventProcessor: Send + Sync + 'static {
    fn process(&self, event: BoxedEvent) -> ProcessFuture;
}

impl<F, Fut> EventProcessor for F
where
    F: Fn(BoxedEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = EventResult<Value>> + Send + 'static,
{
    fn process(&self, event: BoxedEvent) -> ProcessFuture {
        Box::pin(self(event))
    }
}
