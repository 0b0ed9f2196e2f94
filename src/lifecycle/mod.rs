//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Build probe chains → Scheduler + Server components
//!
//! Run (application.rs):
//!     start_async() each component in order
//!     → wait for termination (signals.rs)
//!     → shutdown() on every component
//!     → await_shutdown() on every component
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: server first, then scheduler
//! - Two-phase stop: broadcast every shutdown request, then drain in order
//! - A failing component is logged and never short-circuits the others

pub mod application;
pub mod shutdown;
pub mod signals;
pub mod startup;

use async_trait::async_trait;

use crate::http::server::ServerError;

pub use application::Application;
pub use shutdown::{Shutdown, ShutdownSignal};
pub use startup::{build_application, StartupError};

/// Terminal or stop-time failure of a lifecycle component.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("'{component}' task panicked: {reason}")]
    Panicked { component: String, reason: String },

    #[error("'{component}' shutdown failed: {reason}")]
    Shutdown { component: String, reason: String },
}

/// A background subsystem with start/stop/await-stop operations.
///
/// `start_async` spawns onto the current Tokio runtime and must be called from
/// within one.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Name used in log lines.
    fn name(&self) -> &str;

    /// Begin background operation without waiting for it to initialize.
    fn start_async(&self);

    /// Request a stop. Returns quickly; does not wait for the stop to finish.
    fn shutdown(&self) -> Result<(), LifecycleError>;

    /// Wait until fully stopped, returning the first unexpected error seen.
    async fn await_shutdown(&self) -> Result<(), LifecycleError>;
}
