pub mod error;
pub mod money;
pub mod period;
pub mod query;
pub mod timezone;

pub use error::{AppError, Result};
pub use period::{PeriodKey, MAX_WINDOW_MONTHS};
pub use query::PeriodQuery;
pub use timezone::ReportClock;
