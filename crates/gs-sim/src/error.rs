use gs_control::ControlError;
use gs_core::CoreError;
use gs_flight::FlightError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("mission configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Flight(#[from] FlightError),

    #[error("depth {depth:.1} m exceeds the crush limit of {limit:.0} m")]
    DepthExceeded { depth: f64, limit: f64 },

    #[error("implausible water sample at t = {t:.0} s, z = {z:.1} m, twice in a row")]
    EnvironmentAnomaly { t: f64, z: f64 },
}

pub type SimResult<T> = Result<T, SimError>;
