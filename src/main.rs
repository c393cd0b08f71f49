use career_calc::{config, telemetry, AppConfig, AppError, Cli};
use clap::Parser;

fn main() -> Result<(), AppError> {
    // Before parsing, so `.env` values feed clap's env fallbacks
    let dotenv = config::load_dotenv();
    let cli = Cli::parse();

    telemetry::init(&cli.log_level)?;
    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let config = AppConfig::from_cli(cli)?;
    tracing::info!(
        api_base_url = %config.api_base_url,
        api_key = config.api_key.is_some(),
        share_link = config.initial.is_some(),
        "configuration loaded"
    );

    career_calc::run(config)
}
