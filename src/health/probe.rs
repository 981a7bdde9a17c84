//! Readiness Probe
//!
//! The liveness contract every dependency exposes to the aggregator.

use std::sync::Arc;

use async_trait::async_trait;

/// Non-throwing liveness check with a stable display name.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Performs a minimal liveness check; any failure is reported as `false`.
    async fn is_ready(&self) -> bool;

    /// Label used verbatim in aggregated health output.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: ReadinessProbe + ?Sized> ReadinessProbe for Arc<T> {
    async fn is_ready(&self) -> bool {
        (**self).is_ready().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
