use gs_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("unknown comparison operator `{0}`")]
    UnknownOperator(String),

    #[error("malformed condition: {0}")]
    MalformedCondition(String),

    #[error("unknown actuator directive `{0}`")]
    UnknownDirective(String),

    #[error("{behavior}: {parameter} = {value} is not supported")]
    UnsupportedMode {
        behavior:  &'static str,
        parameter: &'static str,
        value:     f64,
    },

    #[error("behavior configuration error: {0}")]
    Config(String),
}

pub type ControlResult<T> = Result<T, ControlError>;
