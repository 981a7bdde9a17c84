//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: Removes expired in-process entries nobody reads any more

mod sweep;

pub use sweep::spawn_sweep_task;
