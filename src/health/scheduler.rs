//! Periodic polling of probes.
//!
//! # Responsibilities
//! - Run every registered probe on its own fixed-interval timer
//! - Start immediately, then repeat until shutdown
//! - Stop scheduling on shutdown, abandoning any in-flight check
//!
//! # Design Decisions
//! - One task per probe: a slow check only delays its own next tick
//! - Checks of one probe never overlap, so its debounce state has a single writer
//! - Interval resolution is one millisecond; finer fractions are truncated

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::health::probe::Probe;
use crate::lifecycle::{Lifecycle, LifecycleError, Shutdown, ShutdownSignal};

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("polling interval must be at least one millisecond, got {0:?}")]
    ZeroInterval(Duration),
}

/// Lifecycle component that polls a fixed list of probes.
pub struct PollingScheduler {
    interval: Duration,
    probes: Vec<Arc<dyn Probe>>,
    shutdown: Shutdown,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl PollingScheduler {
    pub fn new(interval: Duration, probes: Vec<Arc<dyn Probe>>) -> Result<Self, SchedulerError> {
        let millis = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        let truncated = Duration::from_millis(millis);
        if truncated.is_zero() {
            return Err(SchedulerError::ZeroInterval(interval));
        }

        for probe in &probes {
            tracing::info!(
                probe = %probe.describe(),
                interval_ms = millis,
                "Polling the status of service"
            );
        }

        Ok(Self {
            interval: truncated,
            probes,
            shutdown: Shutdown::new(),
            tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn probe_count(&self) -> usize {
        self.probes.len()
    }
}

#[async_trait]
impl Lifecycle for PollingScheduler {
    fn name(&self) -> &str {
        "scheduler"
    }

    fn start_async(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        if !tasks.is_empty() {
            tracing::warn!("Scheduler already started");
            return;
        }

        tracing::info!(probes = self.probes.len(), "Starting jobs scheduler");
        for probe in &self.probes {
            tasks.push(tokio::spawn(poll(
                probe.clone(),
                self.interval,
                self.shutdown.subscribe(),
            )));
        }
    }

    fn shutdown(&self) -> Result<(), LifecycleError> {
        tracing::info!("Stopping scheduler");
        self.shutdown.trigger();
        Ok(())
    }

    async fn await_shutdown(&self) -> Result<(), LifecycleError> {
        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner));

        let mut first_error = None;
        for task in tasks {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Polling task failed");
                first_error.get_or_insert(LifecycleError::Panicked {
                    component: self.name().to_string(),
                    reason: e.to_string(),
                });
            }
        }

        tracing::info!("Scheduler stopped");
        first_error.map_or(Ok(()), Err)
    }
}

/// Polling loop for a single probe.
async fn poll(probe: Arc<dyn Probe>, interval: Duration, mut shutdown: ShutdownSignal) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => break,
            _ = ticker.tick() => {}
        }

        // The outcome is recorded by the decorators wrapping the probe.
        tokio::select! {
            biased;
            _ = shutdown.recv() => {
                tracing::debug!(probe = %probe.describe(), "Abandoning in-flight check");
                break;
            }
            _ = probe.check() => {}
        }
    }

    tracing::debug!(probe = %probe.describe(), "Polling loop exiting");
}
