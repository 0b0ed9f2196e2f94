//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Probe chain (one per downstream service):
//!     HopefulProbe            debounced Up/Down verdict
//!       → LoggingProbe        logs each outcome
//!         → HttpProbe         one GET, 200 == success
//!
//! Polling (scheduler.rs):
//!     Per-probe timer
//!     → check()
//!     → verdict updated in hopeful.rs
//!
//! Aggregation (aggregate.rs):
//!     HTTP handler
//!     → read every verdict (no I/O)
//!     → geo veto, then AND of services
//! ```
//!
//! # Design Decisions
//! - Decorators compose over the `Probe` trait; no inheritance
//! - The verdict is the only state shared across tasks and is atomic
//! - Failures never escape the probe chain except as the verdict

pub mod aggregate;
pub mod hopeful;
pub mod logging;
pub mod probe;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregate::HealthAggregate;
pub use hopeful::{Fragile, HopefulProbe};
pub use logging::LoggingProbe;
pub use probe::{http_client, HttpClient, HttpProbe, Probe, ProbeError};
pub use scheduler::{PollingScheduler, SchedulerError};
