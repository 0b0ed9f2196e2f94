//! Application coordinator: ordered start, two-phase stop.

use std::future::Future;
use std::sync::Arc;

use crate::lifecycle::{signals, Lifecycle, LifecycleError};

pub struct Application {
    components: Vec<Arc<dyn Lifecycle>>,
}

impl Application {
    /// Components are started, stopped, and awaited in this order.
    pub fn new(components: Vec<Arc<dyn Lifecycle>>) -> Self {
        Self { components }
    }

    pub fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    /// Run until SIGINT or SIGTERM.
    pub async fn run(self) -> Vec<LifecycleError> {
        self.run_until(signals::interrupted()).await
    }

    /// Run until `terminate` resolves, then stop every component.
    ///
    /// Errors are logged as they occur and returned for the caller's
    /// information; none of them cuts the sequence short.
    pub async fn run_until<F>(self, terminate: F) -> Vec<LifecycleError>
    where
        F: Future<Output = ()>,
    {
        for component in &self.components {
            component.start_async();
        }

        terminate.await;
        tracing::info!(components = self.components.len(), "Shutting down");

        let mut errors = Vec::new();
        for component in &self.components {
            if let Err(e) = component.shutdown() {
                tracing::error!(component = component.name(), error = %e, "Shutdown request failed");
                errors.push(e);
            }
        }

        for component in &self.components {
            if let Err(e) = component.await_shutdown().await {
                tracing::error!(component = component.name(), error = %e, "Component stopped with error");
                errors.push(e);
            }
        }

        errors
    }
}
