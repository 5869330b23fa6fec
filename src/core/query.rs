use serde::Deserialize;

use super::period::PeriodKey;
use super::timezone::ReportClock;
use super::{AppError, Result};

/// `?year=&month=` query shared by the monthly endpoints
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PeriodQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl PeriodQuery {
    /// The requested period, or the current one when neither part is given.
    ///
    /// The month is not range-checked; an impossible month reads as empty.
    pub fn resolve(&self, clock: &ReportClock) -> Result<PeriodKey> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => Ok(PeriodKey::new(year, month)),
            (None, None) => Ok(clock.current_period()),
            _ => Err(AppError::validation(
                "year and month must be given together",
            )),
        }
    }
}
