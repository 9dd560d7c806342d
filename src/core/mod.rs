pub mod datetime;
pub mod error;
pub mod money;

pub use datetime::{format_iso8601, parse_datetime_local};
pub use error::{AppError, Result};
pub use money::{display_amount, round_for_display};
