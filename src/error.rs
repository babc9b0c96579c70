//! Error types for the calculator core.
//!
//! Numeric edge cases (division by zero, NaN, non-finite DCF terminal values)
//! are defined results and never surface here. These variants cover caller
//! mistakes at the API boundary and configuration I/O.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Invalid digit: {0} (expected 0-9)")]
    InvalidDigit(u8),
    #[error("Unknown currency code '{0}'")]
    UnknownCurrency(String),
    #[error("Invalid exchange rate for '{code}': {rate}")]
    InvalidRate { code: String, rate: f64 },
    #[error("Unknown memory parameter '{0}'")]
    UnknownParameter(String),
    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),
    #[error("Unknown function '{0}'")]
    UnknownFunction(String),
    #[error("Solver failed: {0}")]
    SolverDidNotConverge(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CalcError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn solver(msg: impl Into<String>) -> Self {
        Self::SolverDidNotConverge(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
