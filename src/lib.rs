//! Dependency health aggregator library

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::HealthcheckConfig;
pub use health::HealthAggregate;
pub use lifecycle::{build_application, Application, Shutdown};
