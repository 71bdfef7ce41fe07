use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlightError {
    #[error("flight parameter `{name}` = {value} is out of range")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("environment provider `{provider}` failed: {reason}")]
    Environment { provider: String, reason: String },
}

pub type FlightResult<T> = Result<T, FlightError>;
