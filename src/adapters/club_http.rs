use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use thiserror::Error;

use crate::domain::credentials::Credentials;
use crate::domain::login_page::{VERIFICATION_TOKEN_FIELD, extract_verification_token};
use crate::domain::visit::{VisitRecord, latest_visit, parse_visit_history};
use crate::domain::visit_window::{Clock, SystemClock, VisitWindow};

pub const DEFAULT_BASE_URL: &str = "https://www.ourclublogin.com";

const LOGIN_PATH: &str = "/Account/Login";
const VISITS_PATH: &str = "/Checkin/GetCustomerVisits";
const USER_AGENT: &str = concat!("our_club_login/", env!("CARGO_PKG_VERSION"));

/// Anything that can produce the latest check-in on demand.
pub trait VisitSource: Send + 'static {
    fn refresh(&mut self) -> Result<VisitRecord, FetchError>;
}

impl<S: VisitSource + ?Sized> VisitSource for Box<S> {
    fn refresh(&mut self) -> Result<VisitRecord, FetchError> {
        (**self).refresh()
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP session: {0}")]
    Session(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to decode visit history: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("visit history contained no check-ins")]
    NoVisits,
    #[error("invalid debug script {path}: {source}")]
    Script {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("debug replay failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Session-holding client for ourclublogin.com.
///
/// Each refresh runs login page, login post and visit query in that order on
/// the same cookie jar. Non-2xx statuses are logged and the sequence carries
/// on; only transport failures and an unusable history end it early.
pub struct OurClubHttpClient<C = SystemClock> {
    session: Client,
    base_url: String,
    credentials: Credentials,
    clock: C,
}

impl OurClubHttpClient<SystemClock> {
    pub fn new(
        base_url: &str,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        Self::with_clock(base_url, credentials, timeout, SystemClock)
    }
}

impl<C: Clock> OurClubHttpClient<C> {
    pub fn with_clock(
        base_url: &str,
        credentials: Credentials,
        timeout: Duration,
        clock: C,
    ) -> Result<Self, FetchError> {
        let session = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Session)?;

        Ok(Self {
            session,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            clock,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn fetch_verification_token(&self) -> Result<Option<String>, FetchError> {
        let return_url = format!("^%^{}", self.credentials.club_id());
        let response = self
            .session
            .get(self.url(LOGIN_PATH))
            .query(&[("ReturnUrl", return_url.as_str())])
            .send()
            .map_err(|source| FetchError::Request {
                endpoint: LOGIN_PATH,
                source,
            })?;

        log_step(
            response.status(),
            "connected to ourclublogin.com",
            "could not connect to ourclublogin.com",
        );

        let body = response.text().map_err(|source| FetchError::Request {
            endpoint: LOGIN_PATH,
            source,
        })?;

        let token = extract_verification_token(&body);
        if token.is_some() {
            tracing::info!("hidden CSRF token acquired");
        } else {
            tracing::error!("could not acquire hidden CSRF token");
        }

        Ok(token)
    }

    fn authenticate(&self, token: Option<&str>) -> Result<(), FetchError> {
        let mut form: Vec<(&str, &str)> = Vec::with_capacity(3);
        if let Some(token) = token {
            form.push((VERIFICATION_TOKEN_FIELD, token));
        }
        form.push(("Username", self.credentials.username()));
        form.push(("Password", self.credentials.password()));

        let response = self
            .session
            .post(self.url(LOGIN_PATH))
            .form(&form)
            .send()
            .map_err(|source| FetchError::Request {
                endpoint: LOGIN_PATH,
                source,
            })?;

        log_step(
            response.status(),
            "authenticated with ourclublogin.com",
            "could not authenticate with ourclublogin.com",
        );

        Ok(())
    }

    fn query_visits(&self) -> Result<Vec<VisitRecord>, FetchError> {
        let window = VisitWindow::year_to_date(&self.clock.now());
        tracing::debug!(
            start_date = %window.start_date(),
            end_date = %window.end_date(),
            "querying customer visits"
        );

        let response = self
            .session
            .post(self.url(VISITS_PATH))
            .form(&window.form_fields())
            .send()
            .map_err(|source| FetchError::Request {
                endpoint: VISITS_PATH,
                source,
            })?;

        log_step(
            response.status(),
            "posted to GetCustomerVisits endpoint",
            "could not post to GetCustomerVisits endpoint",
        );

        let body = response.bytes().map_err(|source| FetchError::Request {
            endpoint: VISITS_PATH,
            source,
        })?;

        parse_visit_history(&body).map_err(FetchError::from)
    }
}

impl<C> VisitSource for OurClubHttpClient<C>
where
    C: Clock + Send + 'static,
{
    fn refresh(&mut self) -> Result<VisitRecord, FetchError> {
        let token = self.fetch_verification_token()?;
        self.authenticate(token.as_deref())?;

        let visits = self.query_visits()?;
        let visit_count = visits.len();
        let latest = latest_visit(visits).ok_or(FetchError::NoVisits)?;

        tracing::info!(
            visit_count,
            check_in_date = %latest.check_in_date,
            club_name = latest.club_name.as_deref().unwrap_or("unknown"),
            "customer visits refreshed"
        );

        Ok(latest)
    }
}

fn log_step(status: StatusCode, success: &str, failure: &str) {
    if status.is_success() {
        tracing::info!(status = status.as_u16(), "{success}");
    } else {
        tracing::error!(status = status.as_u16(), "{failure}");
    }
}
