use thiserror::Error;

/// Errors raised by the device models and chart helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unknown gate: {0}")]
    UnknownGate(String),

    #[error("unknown module: {0}")]
    UnknownModule(String),

    #[error("invalid sweep [{start}, {end}] step {step}: {reason}")]
    InvalidSweep {
        start: f64,
        end: f64,
        step: f64,
        reason: &'static str,
    },

    #[error("invalid logic level: {0}")]
    InvalidBit(String),
}

pub type Result<T> = std::result::Result<T, Error>;
