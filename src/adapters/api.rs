use actix_web::{HttpResponse, Responder, get, web};
use chrono::SecondsFormat;

use crate::app::services::{SensorQueryHandler, ServiceError, SharedSensorState};
use crate::domain::sensor::CheckInState;

#[derive(Clone)]
pub struct ApiState {
    pub sensor_queries: SharedSensorState,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(get_sensor_endpoint)
        .service(get_latest_visit_endpoint);
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[get("/sensor")]
async fn get_sensor_endpoint(state: web::Data<ApiState>) -> impl Responder {
    match state.sensor_queries.current_reading() {
        Ok(reading) => HttpResponse::Ok().json(reading),
        Err(error) => service_error_response(error),
    }
}

#[get("/visits/latest")]
async fn get_latest_visit_endpoint(state: web::Data<ApiState>) -> impl Responder {
    match state.sensor_queries.current_state() {
        Ok(CheckInState::Visit(visit)) => HttpResponse::Ok().json(visit),
        Ok(CheckInState::NoData) => HttpResponse::NoContent().finish(),
        Ok(CheckInState::Failed { error, failed_at }) => {
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": error,
                "failedAt": failed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            }))
        }
        Err(error) => service_error_response(error),
    }
}

fn service_error_response(error: ServiceError) -> HttpResponse {
    match error {
        ServiceError::StateLockPoisoned => {
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "sensor state lock poisoned"
            }))
        }
    }
}
