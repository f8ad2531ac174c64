mod config;
mod error;
mod logging;
mod runtime;
pub mod services;

pub use config::AppConfig;
pub use error::AppError;
pub use runtime::{CheckInSensor, SensorError};

use crate::domain::sensor::INTEGRATION_TITLE;

fn bootstrap() -> Result<AppConfig, AppError> {
    logging::init()?;

    let config = AppConfig::from_env()?;

    tracing::info!(
        integration = INTEGRATION_TITLE,
        club_id = %config.credentials.club_id(),
        username = %config.credentials.username(),
        base_url = %config.base_url,
        poll_interval_secs = config.poll_interval_secs,
        request_timeout_secs = config.request_timeout_secs,
        http_bind = %config.http_bind,
        debug_file = config.debug_file.as_deref().unwrap_or("-"),
        "application bootstrap initialized"
    );

    Ok(config)
}

pub fn run() -> Result<(), AppError> {
    let config = bootstrap()?;
    runtime::run(config)
}

/// Performs a single refresh and prints the sensor reading as JSON.
pub fn run_once() -> Result<(), AppError> {
    let config = bootstrap()?;
    let reading = runtime::run_once(config)?;

    let rendered = serde_json::to_string_pretty(&reading).map_err(AppError::runtime)?;
    println!("{rendered}");

    Ok(())
}
