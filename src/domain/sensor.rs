use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::visit::VisitRecord;

pub const SENSOR_ICON: &str = "mdi:dumbbell";
pub const INTEGRATION_TITLE: &str = "ourclublogin.com";

/// Outcome of the most recent refresh.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CheckInState {
    #[default]
    NoData,
    Visit(VisitRecord),
    Failed {
        error: String,
        failed_at: DateTime<Utc>,
    },
}

impl CheckInState {
    pub fn visit(&self) -> Option<&VisitRecord> {
        match self {
            Self::Visit(visit) => Some(visit),
            _ => None,
        }
    }
}

/// What the host sees for the check-in sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub name: String,
    pub state: Option<String>,
    pub icon: &'static str,
    pub available: bool,
    pub attributes: Map<String, Value>,
    pub last_error: Option<String>,
    pub last_error_at: Option<String>,
}

impl SensorReading {
    pub fn from_state(state: &CheckInState) -> Self {
        match state {
            CheckInState::NoData => Self {
                name: sensor_name(None),
                state: None,
                icon: SENSOR_ICON,
                available: false,
                attributes: Map::new(),
                last_error: None,
                last_error_at: None,
            },
            CheckInState::Visit(visit) => Self {
                name: sensor_name(visit.club_name.as_deref()),
                state: Some(visit.check_in_date.clone()),
                icon: SENSOR_ICON,
                available: true,
                attributes: visit_attributes(visit),
                last_error: None,
                last_error_at: None,
            },
            CheckInState::Failed { error, failed_at } => Self {
                name: sensor_name(None),
                state: None,
                icon: SENSOR_ICON,
                available: false,
                attributes: Map::new(),
                last_error: Some(error.clone()),
                last_error_at: Some(failed_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            },
        }
    }
}

pub fn sensor_name(club_name: Option<&str>) -> String {
    match club_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(club_name) => format!("Last {club_name} Check In"),
        None => "Last Check In".to_string(),
    }
}

fn visit_attributes(visit: &VisitRecord) -> Map<String, Value> {
    let mut attributes = visit.extra.clone();
    if let Some(club_name) = &visit.club_name {
        attributes.insert("ClubName".to_string(), Value::String(club_name.clone()));
    }
    attributes
}
