//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the health
//! aggregator. All types derive Serde traits for deserialization from config
//! files and serialization for the startup dump.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HealthcheckConfig {
    /// Pod metadata echoed in responses.
    pub pod: PodConfig,

    /// Exposer settings.
    pub server: ServerConfig,

    /// Log level and line format.
    pub logging: LoggingConfig,

    /// Periodic polling settings.
    pub schedule: ScheduleConfig,

    /// Outbound probe settings.
    pub probe: ProbeConfig,

    /// Downstream services whose verdicts are AND-ed together.
    pub client_services: ClientServicesConfig,

    /// Optional geo service with veto power over the aggregate.
    #[serde(rename = "geo-healthcheck")]
    pub geo: Option<GeoConfig>,

    /// Consecutive failures tolerated before a service is reported down.
    pub failure_threshold: u32,
}

impl Default for HealthcheckConfig {
    fn default() -> Self {
        Self {
            pod: PodConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            schedule: ScheduleConfig::default(),
            probe: ProbeConfig::default(),
            client_services: ClientServicesConfig::default(),
            geo: None,
            failure_threshold: 0,
        }
    }
}

impl HealthcheckConfig {
    /// Pretty JSON rendering used for the startup log line.
    pub fn as_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| "could not serialize configuration into json".to_string())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PodConfig {
    pub namespace: String,
}

impl Default for PodConfig {
    fn default() -> Self {
        Self {
            namespace: "unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the `/health` route listens on (all interfaces).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Root log level (trace, debug, info, warn, error).
    pub level: String,

    /// Line format (java or json).
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "java".to_string(),
        }
    }
}

/// Polling schedule.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// When false no probes are built and `/health` always reports success.
    pub enabled: bool,

    /// Interval between two checks of the same service, in milliseconds.
    pub delay: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProbeConfig {
    /// Deadline for one outbound request, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_ms: 5000 }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClientServicesConfig {
    pub service_list: Vec<ServiceDescription>,
}

/// One downstream service, probed at `http://{name}:{port}{path}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceDescription {
    #[serde(rename = "service-name")]
    pub name: String,

    pub port: u16,

    #[serde(default = "default_service_path")]
    pub path: String,
}

fn default_service_path() -> String {
    "/health".to_string()
}

impl ServiceDescription {
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}{}", self.name, self.port, self.path)
    }
}

/// Geo service, probed at `{service-name}:{port}/health`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GeoConfig {
    #[serde(rename = "service-name")]
    pub service: String,

    pub port: u16,
}

impl GeoConfig {
    /// The geo service name may carry its own scheme; plain names get `http://`.
    pub fn endpoint(&self) -> String {
        if self.service.contains("://") {
            format!("{}:{}/health", self.service, self.port)
        } else {
            format!("http://{}:{}/health", self.service, self.port)
        }
    }
}
