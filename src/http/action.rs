//! Action handling for derived routes.
//!
//! # Responsibilities
//! - Construct the event from the decoded body
//! - Delegate to the event processor
//! - Render the result or normalize the failure
//!
//! # Design Decisions
//! - No retries and no timeout: the response waits for the processor
//! - The processor result is passed through untouched

use std::sync::Arc;

use axum::{response::Response, routing::MethodRouter, routing::post, Extension};

use crate::events::EventProcessor;
use crate::http::body::JsonBody;
use crate::http::request::RequestContext;
use crate::http::response::{normalize_error, success_response};
use crate::http::server::{method_not_allowed, AppState};
use crate::observability::metrics;
use crate::routing::ActionRoute;

/// Handle one invocation of `route`.
pub async fn handle_action(
    route: &ActionRoute,
    processor: &dyn EventProcessor,
    ctx: &RequestContext,
    JsonBody(payload): JsonBody,
) -> Response {
    let event = match route.descriptor.construct(payload) {
        Ok(event) => event,
        Err(err) => return normalize_error(ctx.span(), &err),
    };

    tracing::info!(
        parent: ctx.span(),
        event_id = %event.id(),
        event = %event.event_type(),
        "created event"
    );
    metrics::record_event_created(event.event_type());

    match processor.process(event).await {
        Ok(result) => success_response(result),
        Err(err) => normalize_error(ctx.span(), &err),
    }
}

/// POST-only method router serving `route`.
pub fn action_router(route: ActionRoute, processor: Arc<dyn EventProcessor>) -> MethodRouter<AppState> {
    let route = Arc::new(route);
    let handler = move |Extension(ctx): Extension<RequestContext>, Extension(body): Extension<JsonBody>| {
        let route = route.clone();
        let processor = processor.clone();
        async move { handle_action(&route, processor.as_ref(), &ctx, body).await }
    };
    post(handler).fallback(method_not_allowed)
}
