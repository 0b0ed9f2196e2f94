//! HTTP exposure subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum serve loop, graceful shutdown)
//!     → handler.rs (method + Accept validation)
//!     → health::HealthAggregate (last-known verdicts)
//!     → canned 200/500 JSON body
//! ```

pub mod handler;
pub mod server;

pub use handler::{HealthHandler, HEALTH_PATH};
pub use server::{HealthServer, ServerError};
