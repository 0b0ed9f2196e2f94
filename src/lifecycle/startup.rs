//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn validated configuration into probe chains
//! - Build the scheduler (when polling is enabled) and the HTTP server
//! - Hand both to the application in start order
//!
//! # Design Decisions
//! - Fail fast: any construction error is fatal and nothing has started yet
//! - The same decorated probe is polled by the scheduler and read by the handler

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::HealthcheckConfig;
use crate::health::{
    http_client, Fragile, HealthAggregate, HopefulProbe, HttpClient, HttpProbe, LoggingProbe,
    PollingScheduler, Probe, ProbeError, SchedulerError,
};
use crate::http::{HealthHandler, HealthServer};
use crate::lifecycle::{Application, Lifecycle};

/// Full decorator chain around one downstream endpoint.
pub type WatchedProbe = HopefulProbe<LoggingProbe<HttpProbe>>;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("could not serialize health responses: {0}")]
    Response(#[from] serde_json::Error),
}

fn watched(
    endpoint: &str,
    client: &HttpClient,
    timeout: Duration,
    threshold: u32,
) -> Result<Arc<WatchedProbe>, ProbeError> {
    let probe = HttpProbe::new(endpoint, client.clone(), timeout)?;
    Ok(Arc::new(HopefulProbe::new(LoggingProbe::new(probe), threshold)))
}

/// Assemble the application described by `config`.
pub fn build_application(config: &HealthcheckConfig) -> Result<Application, StartupError> {
    let mut services: Vec<Arc<WatchedProbe>> = Vec::new();
    let mut geo: Option<Arc<WatchedProbe>> = None;
    let mut scheduler = None;

    if config.schedule.enabled {
        let client = http_client();
        let timeout = Duration::from_millis(config.probe.timeout_ms);
        let threshold = config.failure_threshold;

        for service in &config.client_services.service_list {
            services.push(watched(&service.endpoint(), &client, timeout, threshold)?);
        }
        geo = config
            .geo
            .as_ref()
            .map(|geo| watched(&geo.endpoint(), &client, timeout, threshold))
            .transpose()?;

        let polled: Vec<Arc<dyn Probe>> = services
            .iter()
            .chain(geo.iter())
            .map(|probe| probe.clone() as Arc<dyn Probe>)
            .collect();
        scheduler = Some(PollingScheduler::new(
            Duration::from_millis(config.schedule.delay),
            polled,
        )?);
    } else {
        tracing::info!("Scheduling disabled, /health always reports success");
    }

    let aggregate = HealthAggregate::new(
        services
            .into_iter()
            .map(|probe| probe as Arc<dyn Fragile>)
            .collect(),
        geo.map(|probe| probe as Arc<dyn Fragile>),
    );
    tracing::info!(
        services = aggregate.service_count(),
        geo = aggregate.has_geo(),
        "Health aggregate assembled"
    );
    let handler = HealthHandler::new(&config.pod.namespace, aggregate)?;
    let server = HealthServer::new(SocketAddr::from(([0, 0, 0, 0], config.server.port)), handler);

    let mut components: Vec<Arc<dyn Lifecycle>> = vec![Arc::new(server) as Arc<dyn Lifecycle>];
    if let Some(scheduler) = scheduler {
        components.push(Arc::new(scheduler) as Arc<dyn Lifecycle>);
    }

    Ok(Application::new(components))
}
