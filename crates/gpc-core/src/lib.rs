pub mod error;
pub mod purchase_costs;
pub mod report;
pub mod running_costs;
pub mod schedules;
pub mod types;
pub mod valuation;

pub use error::ValuationError;
pub use types::*;

/// Standard result type for all gpc-core operations
pub type GpcResult<T> = Result<T, ValuationError>;
