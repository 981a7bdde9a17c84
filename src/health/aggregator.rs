//! Dependency Aggregator
//!
//! Runs every registered readiness probe and folds the answers into a single
//! report. Dependencies are handed over explicitly at construction.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::warn;

use super::ReadinessProbe;

/// Readiness of one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyStatus {
    pub name: String,
    pub ready: bool,
}

/// Outcome of a full readiness check.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    /// True only when every dependency is ready
    pub ready: bool,
    /// Per-dependency results in registration order
    pub dependencies: Vec<DependencyStatus>,
}

// == Dependency Aggregator ==
#[derive(Clone, Default)]
pub struct DependencyAggregator {
    dependencies: Vec<Arc<dyn ReadinessProbe>>,
}

impl DependencyAggregator {
    pub fn new(dependencies: Vec<Arc<dyn ReadinessProbe>>) -> Self {
        Self { dependencies }
    }

    /// Probes all dependencies concurrently.
    pub async fn check(&self) -> ReadinessReport {
        let results = join_all(self.dependencies.iter().map(|dep| dep.is_ready())).await;

        let dependencies: Vec<DependencyStatus> = self
            .dependencies
            .iter()
            .zip(results)
            .map(|(dep, ready)| {
                if !ready {
                    warn!("Dependency {} is not ready", dep.name());
                }
                DependencyStatus {
                    name: dep.name().to_string(),
                    ready,
                }
            })
            .collect();

        ReadinessReport {
            ready: dependencies.iter().all(|status| status.ready),
            dependencies,
        }
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}
