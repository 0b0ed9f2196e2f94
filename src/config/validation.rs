//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that enabled scheduling has something to poll
//! - Validate value ranges (threshold, delay, timeout > 0)
//! - Check log level and format names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HealthcheckConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::HealthcheckConfig;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
pub const LOG_FORMATS: [&str; 2] = ["java", "json"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("scheduling is enabled, but no services to check are provided")]
    NothingToSchedule,

    #[error("only positive values are valid for failure-threshold: {0}")]
    FailureThreshold(u32),

    #[error("only positive values are valid for schedule.delay: {0}")]
    ScheduleDelay(u64),

    #[error("only positive values are valid for probe.timeout-ms: {0}")]
    ProbeTimeout(u64),

    #[error("unknown log level '{0}'")]
    LogLevel(String),

    #[error("unknown log format '{0}'")]
    LogFormat(String),
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &HealthcheckConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::LogLevel(config.logging.level.clone()));
    }
    if !LOG_FORMATS.contains(&config.logging.format.as_str()) {
        errors.push(ValidationError::LogFormat(config.logging.format.clone()));
    }
    if config.probe.timeout_ms == 0 {
        errors.push(ValidationError::ProbeTimeout(config.probe.timeout_ms));
    }

    if config.schedule.enabled {
        if config.geo.is_none() && config.client_services.service_list.is_empty() {
            errors.push(ValidationError::NothingToSchedule);
        }
        if config.failure_threshold == 0 {
            errors.push(ValidationError::FailureThreshold(config.failure_threshold));
        }
        if config.schedule.delay == 0 {
            errors.push(ValidationError::ScheduleDelay(config.schedule.delay));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{GeoConfig, ServiceDescription};

    fn scheduled() -> HealthcheckConfig {
        let mut config = HealthcheckConfig::default();
        config.schedule.enabled = true;
        config.schedule.delay = 1000;
        config.failure_threshold = 3;
        config.client_services.service_list.push(ServiceDescription {
            name: "orders".into(),
            port: 8080,
            path: "/health".into(),
        });
        config
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&HealthcheckConfig::default()), Ok(()));
    }

    #[test]
    fn disabled_schedule_skips_polling_checks() {
        let mut config = HealthcheckConfig::default();
        config.failure_threshold = 0;
        config.schedule.delay = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn scheduled_config_is_valid() {
        assert!(validate_config(&scheduled()).is_ok());
    }

    #[test]
    fn geo_alone_is_enough_to_schedule() {
        let mut config = scheduled();
        config.client_services.service_list.clear();
        config.geo = Some(GeoConfig {
            service: "geo".into(),
            port: 80,
        });
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut config = scheduled();
        config.client_services.service_list.clear();
        config.failure_threshold = 0;
        config.schedule.delay = 0;
        config.logging.level = "verbose".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::LogLevel("verbose".into()),
                ValidationError::NothingToSchedule,
                ValidationError::FailureThreshold(0),
                ValidationError::ScheduleDelay(0),
            ]
        );
    }

    #[test]
    fn rejects_zero_probe_timeout_and_unknown_format() {
        let mut config = HealthcheckConfig::default();
        config.probe.timeout_ms = 0;
        config.logging.format = "xml".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ProbeTimeout(0)));
        assert!(errors.contains(&ValidationError::LogFormat("xml".into())));
    }
}
