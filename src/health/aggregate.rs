//! Combined verdict over all debounced services.
//!
//! The geo service holds a veto: when it is down the aggregate is down no
//! matter what the other services report. A healthy geo service does not
//! override the others; the aggregate is then the AND of the services.

use std::sync::Arc;

use crate::health::hopeful::Fragile;

pub struct HealthAggregate {
    services: Vec<Arc<dyn Fragile>>,
    geo: Option<Arc<dyn Fragile>>,
}

impl HealthAggregate {
    pub fn new(services: Vec<Arc<dyn Fragile>>, geo: Option<Arc<dyn Fragile>>) -> Self {
        Self { services, geo }
    }

    /// Aggregate with nothing to watch; always healthy.
    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    pub fn has_geo(&self) -> bool {
        self.geo.is_some()
    }
}

impl Fragile for HealthAggregate {
    /// Reads last-known verdicts only; never blocks on I/O.
    fn is_healthy(&self) -> bool {
        if let Some(geo) = &self.geo {
            if !geo.is_healthy() {
                return false;
            }
        }
        self.services.iter().all(|service| service.is_healthy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Stub(AtomicBool);

    impl Stub {
        fn new(healthy: bool) -> Arc<Self> {
            Arc::new(Self(AtomicBool::new(healthy)))
        }
    }

    impl Fragile for Stub {
        fn is_healthy(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn services(verdicts: &[bool]) -> Vec<Arc<dyn Fragile>> {
        verdicts
            .iter()
            .map(|&healthy| Stub::new(healthy) as Arc<dyn Fragile>)
            .collect()
    }

    fn geo(healthy: bool) -> Option<Arc<dyn Fragile>> {
        Some(Stub::new(healthy))
    }

    #[test]
    fn no_services_is_vacuously_healthy() {
        let aggregate = HealthAggregate::empty();
        assert_eq!(aggregate.service_count(), 0);
        assert!(!aggregate.has_geo());
        assert!(aggregate.is_healthy());
    }

    #[test]
    fn counts_what_it_watches() {
        let aggregate = HealthAggregate::new(services(&[true, false]), geo(true));
        assert_eq!(aggregate.service_count(), 2);
        assert!(aggregate.has_geo());
    }

    #[test]
    fn and_of_all_services_without_geo() {
        assert!(HealthAggregate::new(services(&[true, true, true]), None).is_healthy());
        assert!(!HealthAggregate::new(services(&[true, false, true]), None).is_healthy());
        assert!(!HealthAggregate::new(services(&[false]), None).is_healthy());
    }

    #[test]
    fn down_geo_vetoes_healthy_services() {
        let aggregate = HealthAggregate::new(services(&[true, true]), geo(false));
        assert!(!aggregate.is_healthy());
    }

    #[test]
    fn down_geo_alone_is_down() {
        let aggregate = HealthAggregate::new(Vec::new(), geo(false));
        assert!(!aggregate.is_healthy());
    }

    #[test]
    fn healthy_geo_does_not_override_down_services() {
        let aggregate = HealthAggregate::new(services(&[true, false]), geo(true));
        assert!(!aggregate.is_healthy());
    }

    #[test]
    fn healthy_geo_and_services_is_healthy() {
        let aggregate = HealthAggregate::new(services(&[true]), geo(true));
        assert!(aggregate.is_healthy());
    }

    #[test]
    fn follows_live_verdict_changes() {
        let geo = Stub::new(true);
        let aggregate = HealthAggregate::new(services(&[true]), Some(geo.clone() as Arc<dyn Fragile>));
        assert!(aggregate.is_healthy());

        geo.0.store(false, Ordering::SeqCst);
        assert!(!aggregate.is_healthy());

        geo.0.store(true, Ordering::SeqCst);
        assert!(aggregate.is_healthy());
    }
}
