use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use chrono::Utc;
use thiserror::Error;

use crate::adapters::api::{ApiState, configure_routes};
use crate::adapters::club_debug_file::DebugFileVisitSource;
use crate::adapters::club_http::{FetchError, OurClubHttpClient, VisitSource};
use crate::app::config::AppConfig;
use crate::app::error::AppError;
use crate::app::services::{
    SensorCommandHandler, SensorQueryHandler, ServiceError, SharedSensorState,
};
use crate::domain::sensor::{CheckInState, SensorReading};

const STOP_CHECK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("refresh failed: {0}")]
    Refresh(#[source] FetchError),
    #[error("failed to record sensor state: {0}")]
    State(#[source] ServiceError),
}

/// The check-in sensor entity: refreshes its source on demand and publishes
/// the outcome to the shared state.
pub struct CheckInSensor<S> {
    source: S,
    state: SharedSensorState,
}

impl<S> CheckInSensor<S>
where
    S: VisitSource,
{
    pub fn new(source: S, state: SharedSensorState) -> Self {
        Self { source, state }
    }

    /// Runs one refresh. A failure replaces any previous visit with `Failed`.
    pub fn update(&mut self) -> Result<(), SensorError> {
        match self.source.refresh() {
            Ok(visit) => {
                tracing::info!(
                    check_in_date = %visit.check_in_date,
                    "check-in sensor updated"
                );
                self.state
                    .record_state(CheckInState::Visit(visit))
                    .map_err(SensorError::State)
            }
            Err(error) => {
                self.state
                    .record_state(CheckInState::Failed {
                        error: error.to_string(),
                        failed_at: Utc::now(),
                    })
                    .map_err(SensorError::State)?;
                Err(SensorError::Refresh(error))
            }
        }
    }

    pub fn reading(&self) -> Result<SensorReading, ServiceError> {
        self.state.current_reading()
    }
}

pub fn start_poller<S>(
    mut sensor: CheckInSensor<S>,
    poll_interval: Duration,
    stop_flag: Arc<AtomicBool>,
) -> JoinHandle<()>
where
    S: VisitSource,
{
    std::thread::spawn(move || {
        while !stop_flag.load(Ordering::Relaxed) {
            if let Err(error) = sensor.update() {
                tracing::warn!(error = %error, "poll cycle failed");
            }
            sleep_unless_stopped(poll_interval, &stop_flag);
        }
        tracing::info!("poller stopped");
    })
}

// A deadline past what `Instant` can represent means waiting until stopped.
fn sleep_unless_stopped(duration: Duration, stop_flag: &AtomicBool) {
    let deadline = Instant::now().checked_add(duration);
    while !stop_flag.load(Ordering::Relaxed) {
        let wait = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return;
                }
                STOP_CHECK_INTERVAL.min(deadline - now)
            }
            None => STOP_CHECK_INTERVAL,
        };
        std::thread::sleep(wait);
    }
}

fn build_visit_source(config: &AppConfig) -> Result<Box<dyn VisitSource>, AppError> {
    match &config.debug_file {
        Some(path) => {
            tracing::warn!(debug_file = %path, "replaying visits from debug file");
            let source = DebugFileVisitSource::from_file(path).map_err(AppError::visit_source)?;
            Ok(Box::new(source))
        }
        None => {
            let client = OurClubHttpClient::new(
                &config.base_url,
                config.credentials.clone(),
                Duration::from_secs(config.request_timeout_secs),
            )
            .map_err(AppError::visit_source)?;
            Ok(Box::new(client))
        }
    }
}

pub fn run(config: AppConfig) -> Result<(), AppError> {
    let shared_state = SharedSensorState::new();
    let api_state = ApiState {
        sensor_queries: shared_state.clone(),
    };

    let sensor = CheckInSensor::new(build_visit_source(&config)?, shared_state);
    let stop_flag = Arc::new(AtomicBool::new(false));
    let poller_handle = start_poller(
        sensor,
        Duration::from_secs(config.poll_interval_secs),
        Arc::clone(&stop_flag),
    );

    tracing::info!(bind = %config.http_bind, "http server starting");

    let server_result = actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .app_data(web::Data::new(api_state.clone()))
                .configure(configure_routes)
        })
        .bind(&config.http_bind)?
        .run()
        .await
    });

    stop_flag.store(true, Ordering::Relaxed);
    let join_result = poller_handle.join();

    if join_result.is_err() {
        return Err(AppError::runtime("poller thread panicked"));
    }

    server_result.map_err(AppError::runtime)
}

/// Single refresh, for checking credentials from the command line.
pub fn run_once(config: AppConfig) -> Result<SensorReading, AppError> {
    let mut sensor = CheckInSensor::new(build_visit_source(&config)?, SharedSensorState::new());

    sensor.update().map_err(AppError::refresh)?;
    sensor.reading().map_err(AppError::runtime)
}
