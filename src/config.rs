//! Launcher configuration
//!
//! Command-line flags win over environment variables, which win over the
//! built-in defaults. A `.env` file is loaded into the environment first.

use career_calc_types::share::{self, ShareLinkError};
use career_calc_types::FilterCriteria;
use career_calc_ui::{AppOptions, DEFAULT_API_BASE_URL};
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Log filter used when neither `RUST_LOG` nor `--log-level` is set
pub const DEFAULT_LOG_FILTER: &str = "career_calc=info,career_calc_ui=info";

#[derive(Parser, Debug, Clone)]
#[command(name = "career-calc")]
#[command(about = "Find out what share of jobs meets your salary, education and experience criteria")]
pub struct Cli {
    /// Base URL of the calculation service
    #[arg(long, env = "CAREER_CALC_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// API key sent as X-API-Key on every request
    #[arg(long, env = "CAREER_CALC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Share link to open with (query string or full URL)
    #[arg(long)]
    pub link: Option<String>,

    /// Log filter, e.g. "debug" or "career_calc_ui=trace"
    #[arg(long, env = "CAREER_CALC_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base URL '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API base URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("invalid share link: {0}")]
    ShareLink(#[from] ShareLinkError),
}

/// Validated launcher settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// No trailing slash
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub initial: Option<FilterCriteria>,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let api_base_url = normalize_base_url(&cli.api_base_url)?;
        let api_key = cli.api_key.filter(|key| !key.trim().is_empty());
        let initial = cli
            .link
            .as_deref()
            .filter(|link| !link.trim().is_empty())
            .map(share::decode)
            .transpose()?;

        Ok(Self {
            api_base_url,
            api_key,
            initial,
        })
    }

    pub fn into_app_options(self) -> AppOptions {
        AppOptions {
            base_url: self.api_base_url,
            api_key: self.api_key,
            initial: self.initial,
        }
    }
}

/// Load `.env` if present. Returns the file that was read.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
