use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("telemetry error: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// `RUST_LOG` wins; otherwise `default_filter` is used.
pub fn build_filter(default_filter: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter).map_err(|source| TelemetryError::EnvFilter {
            value: default_filter.to_string(),
            source,
        }),
    }
}

pub fn init(default_filter: &str) -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(build_filter(default_filter)?)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()?;
    Ok(())
}
