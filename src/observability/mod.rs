//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!
//! logging.rs:
//!     EnvFilter (CLI flag > RUST_LOG > config)
//!     → java line format or JSON
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Structured fields everywhere; the line format is a sink concern
//! - The Java-style format matches the log shape of the surrounding platform
//! - Logging is initialised once, after configuration is loaded

pub mod logging;

pub use logging::{init_logging, JavaFormat, LoggingError};
