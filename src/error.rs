use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use thiserror::Error;

/// Anything that stops the launcher
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("UI error: {0}")]
    Ui(#[from] eframe::Error),
}
