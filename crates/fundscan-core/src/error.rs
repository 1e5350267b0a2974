use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FundscanError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FundscanError {
    fn from(e: serde_json::Error) -> Self {
        FundscanError::SerializationError(e.to_string())
    }
}
