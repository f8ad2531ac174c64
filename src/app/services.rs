use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::domain::sensor::{CheckInState, SensorReading};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("sensor state lock poisoned")]
    StateLockPoisoned,
}

pub trait SensorQueryHandler {
    fn current_state(&self) -> Result<CheckInState, ServiceError>;
    fn current_reading(&self) -> Result<SensorReading, ServiceError>;
}

pub trait SensorCommandHandler {
    fn record_state(&self, state: CheckInState) -> Result<(), ServiceError>;
}

/// Latest check-in state, shared between the poller and the HTTP API.
#[derive(Clone, Default)]
pub struct SharedSensorState {
    state: Arc<Mutex<CheckInState>>,
}

impl SharedSensorState {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, op: impl FnOnce(&mut CheckInState) -> T) -> Result<T, ServiceError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ServiceError::StateLockPoisoned)?;
        Ok(op(&mut state))
    }
}

impl SensorQueryHandler for SharedSensorState {
    fn current_state(&self) -> Result<CheckInState, ServiceError> {
        self.with_state(|state| state.clone())
    }

    fn current_reading(&self) -> Result<SensorReading, ServiceError> {
        self.with_state(|state| SensorReading::from_state(state))
    }
}

impl SensorCommandHandler for SharedSensorState {
    fn record_state(&self, new_state: CheckInState) -> Result<(), ServiceError> {
        self.with_state(|state| *state = new_state)
    }
}
