//! Probe doubles for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::health::probe::{Probe, ProbeError};

/// Replays a fixed sequence of outcomes, then keeps succeeding (or failing).
pub struct ScriptedProbe {
    name: String,
    outcomes: Mutex<VecDeque<bool>>,
    calls: AtomicUsize,
    delay: Duration,
    fallback: bool,
}

impl ScriptedProbe {
    pub fn new(name: &str, outcomes: impl IntoIterator<Item = bool>) -> Self {
        Self {
            name: name.to_string(),
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            fallback: true,
        }
    }

    pub fn healthy(name: &str) -> Self {
        Self::new(name, Vec::new())
    }

    /// Every check sleeps for `delay` before answering.
    pub fn slow(name: &str, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::healthy(name)
        }
    }

    /// Every check fails once the script runs out.
    pub fn failing(self) -> Self {
        Self {
            fallback: false,
            ..self
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn check(&self) -> Result<(), ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let healthy = self.outcomes.lock().unwrap().pop_front().unwrap_or(self.fallback);
        if healthy {
            Ok(())
        } else {
            Err(ProbeError::Transport {
                endpoint: self.name.clone(),
                reason: "scripted failure".to_string(),
            })
        }
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
