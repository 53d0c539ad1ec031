pub mod error;
pub mod payoff;
pub mod time_value;
pub mod types;

pub use error::PayoffError;
pub use types::*;

/// Standard result type for all payoff operations
pub type PayoffEngineResult<T> = Result<T, PayoffError>;
