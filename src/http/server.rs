//! HTTP server lifecycle component.
//!
//! # Responsibilities
//! - Bind the listener and serve the health router in a background task
//! - Stop accepting on shutdown and let in-flight requests finish
//! - Report bind or serve failures through `await_shutdown`

use std::net::SocketAddr;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::http::handler::HealthHandler;
use crate::lifecycle::{Lifecycle, LifecycleError, Shutdown, ShutdownSignal};

/// Server runtime error.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Exposes the aggregate verdict over HTTP.
pub struct HealthServer {
    addr: SocketAddr,
    router: Router,
    shutdown: Shutdown,
    task: Mutex<Option<JoinHandle<Result<(), ServerError>>>>,
}

impl HealthServer {
    pub fn new(addr: SocketAddr, handler: HealthHandler) -> Self {
        Self {
            addr,
            router: handler.into_router(),
            shutdown: Shutdown::new(),
            task: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Lifecycle for HealthServer {
    fn name(&self) -> &str {
        "http server"
    }

    fn start_async(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.is_some() {
            tracing::warn!("HTTP server already started");
            return;
        }

        tracing::info!("Starting HTTP server");
        *task = Some(tokio::spawn(serve(
            self.addr,
            self.router.clone(),
            self.shutdown.subscribe(),
        )));
    }

    fn shutdown(&self) -> Result<(), LifecycleError> {
        tracing::info!("Stopping HTTP server");
        self.shutdown.trigger();
        Ok(())
    }

    async fn await_shutdown(&self) -> Result<(), LifecycleError> {
        tracing::info!("Waiting for HTTP server to stop");
        let task = self.task.lock().unwrap_or_else(PoisonError::into_inner).take();
        let Some(task) = task else {
            return Ok(());
        };

        let result = match task.await {
            Ok(result) => result.map_err(LifecycleError::from),
            Err(e) => Err(LifecycleError::Panicked {
                component: self.name().to_string(),
                reason: e.to_string(),
            }),
        };
        tracing::info!("HTTP server stopped");
        result
    }
}

/// Accept loop; returns once shutdown is signalled and connections drain.
async fn serve(addr: SocketAddr, router: Router, mut shutdown: ShutdownSignal) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    if let Ok(local) = listener.local_addr() {
        tracing::info!(address = %local, "Listening for connections");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.recv().await })
        .await
        .map_err(ServerError::Serve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthAggregate;
    use std::time::Duration;

    fn server(port: u16) -> HealthServer {
        let handler = HealthHandler::new("test", HealthAggregate::empty()).unwrap();
        HealthServer::new(SocketAddr::from(([127, 0, 0, 1], port)), handler)
    }

    #[tokio::test]
    async fn serves_until_shutdown() {
        let server = server(28591);
        server.start_async();
        tokio::time::sleep(Duration::from_millis(200)).await;

        let response = reqwest::Client::builder()
            .no_proxy()
            .build()
            .unwrap()
            .get("http://127.0.0.1:28591/health")
            .header("accept", "application/json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        server.shutdown().unwrap();
        tokio::time::timeout(Duration::from_secs(5), server.await_shutdown())
            .await
            .expect("server stops")
            .unwrap();
    }

    #[tokio::test]
    async fn bind_failure_surfaces_from_await_shutdown() {
        let _occupied = std::net::TcpListener::bind("127.0.0.1:28592").unwrap();

        let server = server(28592);
        server.start_async();
        let err = tokio::time::timeout(Duration::from_secs(5), server.await_shutdown())
            .await
            .expect("bind failure ends the task")
            .unwrap_err();
        assert!(matches!(err, LifecycleError::Server(ServerError::Bind { .. })));
    }

    #[tokio::test]
    async fn await_without_start_returns_immediately() {
        let server = server(28593);
        server.shutdown().unwrap();
        server.await_shutdown().await.unwrap();
    }
}
