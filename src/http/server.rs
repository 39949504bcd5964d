//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Derive the action routes from the event registry (once)
//! - Create the Axum Router with the health route and every action route
//! - Wire up the pipeline in order: correlation, CORS, panic capture,
//!   body decoding
//! - Bind the listener and serve until shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::Method,
    middleware,
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, Any, CorsLayer},
};

use crate::config::ServiceConfig;
use crate::error::{ErrorKind, EventError};
use crate::events::{EventProcessor, EventRegistry};
use crate::health::{health_check, AlwaysHealthy, HealthProbe, HEALTH_PATH};
use crate::http::action::action_router;
use crate::http::body::decode_json_body;
use crate::http::request::{correlate, RequestContext};
use crate::http::response::{normalize_error, panic_response};
use crate::routing::{derive_routes, RouteError};

/// Shared state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub health: Arc<dyn HealthProbe>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(health: Arc<dyn HealthProbe>, max_body_bytes: usize) -> Self {
        Self {
            health,
            max_body_bytes,
        }
    }
}

/// Build the application router.
///
/// Fails if the registry derives colliding or unusable routes.
pub fn create_app(
    registry: &EventRegistry,
    processor: Arc<dyn EventProcessor>,
    state: AppState,
) -> Result<Router, RouteError> {
    tracing::trace!("creating rest interface app");

    let mut router = Router::new().route(HEALTH_PATH, get(health_check).fallback(method_not_allowed));
    for route in derive_routes(registry)? {
        let path = route.path.clone();
        router = router.route(&path, action_router(route, processor.clone()));
    }

    Ok(router
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), decode_json_body))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer())
        .layer(middleware::from_fn(correlate))
        .with_state(state))
}

/// Any origin, the usual methods, requested headers mirrored.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

async fn not_found(request: Request) -> Response {
    reject(ErrorKind::NotFound, &request)
}

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed(request: Request) -> Response {
    reject(ErrorKind::MethodNotAllowed, &request)
}

fn reject(kind: ErrorKind, request: &Request) -> Response {
    let ctx = request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();
    let err = EventError::new(
        kind,
        format!("Cannot {} {}", request.method(), request.uri().path()),
    );
    normalize_error(ctx.span(), &err)
}

/// REST interface exposing registry actions over HTTP.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server reporting itself healthy unconditionally.
    pub fn new<P>(config: ServiceConfig, registry: &EventRegistry, processor: P) -> Result<Self, RouteError>
    where
        P: EventProcessor,
    {
        Self::with_probe(config, registry, processor, AlwaysHealthy)
    }

    /// Create a server with a custom liveness probe.
    pub fn with_probe<P, H>(
        config: ServiceConfig,
        registry: &EventRegistry,
        processor: P,
        probe: H,
    ) -> Result<Self, RouteError>
    where
        P: EventProcessor,
        H: HealthProbe,
    {
        let state = AppState::new(Arc::new(probe), config.rest.max_body_bytes);
        let router = create_app(registry, Arc::new(processor), state)?;
        Ok(Self { router, config })
    }

    /// Bind the configured listen address.
    pub async fn bind(&self) -> Result<TcpListener, std::io::Error> {
        TcpListener::bind(self.config.rest.bind_address()).await
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(port = addr.port(), address = %addr, "rest interface started");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("rest interface stopped");
        Ok(())
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

impl std::fmt::Debug for HttpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
