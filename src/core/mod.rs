pub mod error;
pub mod timestamp;

pub use error::{AppError, Result};
pub use timestamp::{current_timestamp, format_timestamp};
