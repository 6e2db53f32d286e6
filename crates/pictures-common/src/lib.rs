//! Common types shared across the mars-pictures services.

pub mod error;
pub mod rover;
pub mod time;

pub use error::{ApiError, ApiResult};
pub use rover::Rover;
pub use time::normalize_date;
