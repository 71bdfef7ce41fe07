//! Core error type.
//!
//! Downstream crates wrap `CoreError` as one variant of their own enum via
//! `#[from]` rather than converting into it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown state field `{0}`")]
    UnknownField(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("time {0} s is outside the representable calendar range")]
    TimeOutOfRange(f64),
}

/// Shorthand result type for `gs-core`.
pub type CoreResult<T> = Result<T, CoreError>;
