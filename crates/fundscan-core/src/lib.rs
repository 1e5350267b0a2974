pub mod analyze;
pub mod cashflow;
pub mod classify;
pub mod commission;
pub mod error;
pub mod rating;
pub mod solver;
pub mod types;

pub use error::FundscanError;
pub use types::*;

/// Standard result type for all fundscan operations
pub type FundscanResult<T> = Result<T, FundscanError>;
