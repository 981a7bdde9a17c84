//! Health Module
//!
//! Readiness probing for the cache drivers and any other dependency the
//! host application wants reported alongside them.

mod aggregator;
mod probe;

pub use aggregator::{DependencyAggregator, DependencyStatus, ReadinessReport};
pub use probe::ReadinessProbe;
