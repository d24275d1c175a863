pub mod amortization;
pub mod buydown;
pub mod error;
pub mod payment;
pub mod tax;
pub mod types;

pub use error::MortgageError;
pub use types::*;

/// Standard result type for all mortgage-core operations
pub type MortgageResult<T> = Result<T, MortgageError>;
