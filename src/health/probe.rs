//! Liveness probes.

/// Decides whether the service should report itself healthy.
pub trait HealthProbe: Send + Sync + 'static {
    fn is_healthy(&self) -> bool;
}

/// Probe that performs no checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysHealthy;

impl HealthProbe for AlwaysHealthy {
    fn is_healthy(&self) -> bool {
        // TODO: probe the event processor's dependencies once it exposes a readiness hook.
        true
    }
}

impl<F> HealthProbe for F
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    fn is_healthy(&self) -> bool {
        self()
    }
}
