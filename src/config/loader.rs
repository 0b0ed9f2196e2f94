//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::schema::HealthcheckConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Locations searched when no explicit config path is given.
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["config.toml", "/etc/healthcheck/config.toml"];

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for environment variable {var}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, override from the process environment, and validate.
///
/// An explicit `path` must exist. Without one the default locations are tried
/// in order and built-in defaults are used when none of them exist.
pub fn load_config(path: Option<&Path>) -> Result<HealthcheckConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => match DEFAULT_CONFIG_PATHS.iter().map(Path::new).find(|p| p.is_file()) {
            Some(found) => read_config_file(found)?,
            None => HealthcheckConfig::default(),
        },
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<HealthcheckConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parse a TOML document without validating it.
pub fn parse_config(content: &str) -> Result<HealthcheckConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Apply `SECTION_KEY` style environment overrides on top of file values.
pub fn apply_env_overrides<F>(config: &mut HealthcheckConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(namespace) = lookup("POD_NAMESPACE") {
        config.pod.namespace = namespace;
    }
    if let Some(level) = lookup("LOGGING_LEVEL_ROOT") {
        config.logging.level = level;
    }
    if let Some(format) = lookup("LOGGING_FORMAT") {
        config.logging.format = format;
    }
    if let Some(port) = parsed(&lookup, "SERVER_PORT")? {
        config.server.port = port;
    }
    if let Some(enabled) = parsed(&lookup, "SCHEDULE_ENABLED")? {
        config.schedule.enabled = enabled;
    }
    if let Some(delay) = parsed(&lookup, "SCHEDULE_DELAY")? {
        config.schedule.delay = delay;
    }
    if let Some(threshold) = parsed(&lookup, "FAILURE_THRESHOLD")? {
        config.failure_threshold = threshold;
    }
    if let Some(timeout) = parsed(&lookup, "PROBE_TIMEOUT_MS")? {
        config.probe.timeout_ms = timeout;
    }
    Ok(())
}

fn parsed<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value }),
    }
}
