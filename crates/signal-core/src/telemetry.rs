use crate::config::{AppConfig, AppEnvironment};
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    Filter { directive: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { directive, .. } => {
                write!(f, "cannot parse log filter '{directive}'")
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry init failed: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the configured
/// level; development keeps targets and colors, everything else logs compact
/// plain text.
pub fn init(config: &AppConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.telemetry.log_level).map_err(|source| {
            TelemetryError::Filter {
                directive: config.telemetry.log_level.clone(),
                source,
            }
        })?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.environment == AppEnvironment::Development {
        builder.try_init()
    } else {
        builder
            .compact()
            .with_target(false)
            .with_ansi(false)
            .try_init()
    };

    result.map_err(TelemetryError::Subscriber)
}
