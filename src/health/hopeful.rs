//! Debounced verdict over a probe's raw outcomes.
//!
//! # States
//! - Up: the service is reported healthy
//! - Down: the service is reported unhealthy
//!
//! # State Transitions
//! ```text
//! Up → Down: a failure arrives while consecutive failures >= threshold
//! Down → Up: any single success
//! ```
//!
//! With threshold T, T consecutive failures are tolerated and the (T+1)-th
//! flips the verdict. T = 0 trips on the first failure.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use crate::health::probe::{Probe, ProbeError};

/// Anything that can report a current up/down verdict without doing I/O.
pub trait Fragile: Send + Sync {
    fn is_healthy(&self) -> bool;
}

/// Decorator that keeps reporting healthy until the threshold is exceeded.
pub struct HopefulProbe<P> {
    inner: P,
    threshold: u32,
    /// Written only from the probe's own polling task.
    failures: AtomicU32,
    /// Written by the polling task, read concurrently by request handlers.
    healthy: AtomicBool,
}

impl<P: Probe> HopefulProbe<P> {
    pub fn new(inner: P, threshold: u32) -> Self {
        Self {
            inner,
            threshold,
            failures: AtomicU32::new(0),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.failures.load(Ordering::Relaxed)
    }

    fn failed(&self) {
        let failures = self.failures.load(Ordering::Relaxed);
        if failures < self.threshold {
            self.failures.store(failures + 1, Ordering::Relaxed);
            return;
        }
        if self.healthy.swap(false, Ordering::AcqRel) {
            tracing::warn!(
                probe = %self.inner.describe(),
                failures = failures + 1,
                threshold = self.threshold,
                "Service marked down"
            );
        }
    }

    fn succeeded(&self) {
        self.failures.store(0, Ordering::Relaxed);
        if !self.healthy.swap(true, Ordering::AcqRel) {
            tracing::info!(probe = %self.inner.describe(), "Service recovered");
        }
    }
}

#[async_trait]
impl<P: Probe> Probe for HopefulProbe<P> {
    /// Returns the wrapped probe's result unchanged; debouncing only shows in
    /// [`Fragile::is_healthy`].
    async fn check(&self) -> Result<(), ProbeError> {
        let result = self.inner.check().await;
        match result {
            Ok(()) => self.succeeded(),
            Err(_) => self.failed(),
        }
        result
    }

    fn describe(&self) -> String {
        format!("hopeful decorator for {}", self.inner.describe())
    }
}

impl<P: Probe> Fragile for HopefulProbe<P> {
    fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Acquire)
    }
}
