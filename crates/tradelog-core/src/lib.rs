pub mod error;
pub mod trades;
pub mod types;

#[cfg(feature = "risk")]
pub mod risk;

#[cfg(feature = "tags")]
pub mod tags;

#[cfg(feature = "insights")]
pub mod insights;

#[cfg(feature = "calendar")]
pub mod calendar;

pub use error::TradeLogError;
pub use trades::*;
pub use types::*;

/// Standard result type for all tradelog operations
pub type TradeLogResult<T> = Result<T, TradeLogError>;
