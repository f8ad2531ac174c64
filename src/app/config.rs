use crate::adapters::club_http::DEFAULT_BASE_URL;
use crate::app::AppError;
use crate::domain::credentials::Credentials;

const MAX_POLL_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;
const MAX_HTTP_TIMEOUT_SECS: u64 = 60 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub base_url: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub http_bind: String,
    pub debug_file: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = Credentials::new(
            required_verbatim(&lookup, "CLUB_ID")?,
            required_verbatim(&lookup, "CLUB_USERNAME")?,
            required_verbatim(&lookup, "CLUB_PASSWORD")?,
        )
        .map_err(AppError::config)?;

        Ok(Self {
            credentials,
            base_url: optional(&lookup, "CLUB_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            poll_interval_secs: parse_bounded_or_default(
                &lookup,
                "POLL_INTERVAL_SECS",
                900,
                MAX_POLL_INTERVAL_SECS,
            )?,
            request_timeout_secs: parse_bounded_or_default(
                &lookup,
                "HTTP_TIMEOUT_SECS",
                30,
                MAX_HTTP_TIMEOUT_SECS,
            )?,
            http_bind: optional(&lookup, "HTTP_BIND")
                .unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            debug_file: optional(&lookup, "CLUB_DEBUG_FILE"),
        })
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Credential values go to the site exactly as entered; only blank ones are rejected.
fn required_verbatim<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("{key} is required")))
}

fn parse_bounded_or_default<F>(
    lookup: &F,
    key: &str,
    default: u64,
    max: u64,
) -> Result<u64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(0) => Err(AppError::config(format!("{key} must be greater than zero"))),
            Ok(value) if value > max => Err(AppError::config(format!(
                "{key} must be at most {max} seconds"
            ))),
            Ok(value) => Ok(value),
            Err(_) => Err(AppError::config(format!("{key} must be a valid number"))),
        },
        None => Ok(default),
    }
}
