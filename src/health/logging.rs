//! Logging decorator: reports every check outcome, changes nothing.

use async_trait::async_trait;

use crate::health::probe::{Probe, ProbeError};

pub struct LoggingProbe<P> {
    inner: P,
}

impl<P: Probe> LoggingProbe<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: Probe> Probe for LoggingProbe<P> {
    async fn check(&self) -> Result<(), ProbeError> {
        let result = self.inner.check().await;
        match &result {
            Ok(()) => tracing::debug!(probe = %self.inner.describe(), "Service is OK"),
            Err(e) => tracing::warn!(probe = %self.inner.describe(), error = %e, "Service is not OK"),
        }
        result
    }

    fn describe(&self) -> String {
        format!("logging decorator for {}", self.inner.describe())
    }
}
