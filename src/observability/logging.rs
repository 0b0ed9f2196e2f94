//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global subscriber from configuration
//! - Resolve the level filter from CLI, environment and config
//! - Render events as Java-style lines or JSON
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `java` is the default format, `json` for log shippers

use std::fmt;

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use crate::config::LoggingConfig;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Logging already initialised: {0}")]
    Init(#[from] TryInitError),
}

/// `2024-01-01T00:00:00.000000Z [INFO   ] message key=value`
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaFormat;

impl<S, N> FormatEvent<S, N> for JavaFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        SystemTime.format_time(&mut writer)?;
        write!(writer, " [{:<7}] ", event.metadata().level().as_str())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// First present of: CLI flag, `RUST_LOG`, configured level.
fn filter_directives(cli: Option<&str>, env: Option<String>, configured: &str) -> String {
    cli.map(str::to_string)
        .or(env.filter(|directives| !directives.trim().is_empty()))
        .unwrap_or_else(|| configured.to_string())
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig, cli_level: Option<&str>) -> Result<(), LoggingError> {
    let directives = filter_directives(
        cli_level,
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        &config.level,
    );
    let filter = EnvFilter::try_new(directives)?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
        _ => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .event_format(JavaFormat),
            )
            .try_init()?,
    }

    Ok(())
}
