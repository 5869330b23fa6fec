use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};

use super::period::PeriodKey;
use super::{AppError, Result};

/// Reporting timezone handling
/// All "current month" decisions are made in the complex's local offset,
/// not in UTC, so a request at 23:30 local time on the last day of the
/// month still lands in that month.
#[derive(Debug, Clone, Copy)]
pub struct ReportClock {
    offset: FixedOffset,
}

impl ReportClock {
    /// Build a clock for a whole-hour UTC offset (e.g. -3 for Buenos Aires)
    pub fn from_offset_hours(hours: i32) -> Result<Self> {
        let offset = FixedOffset::east_opt(hours * 3600).ok_or_else(|| {
            AppError::Configuration(format!("Invalid UTC offset: {} hours", hours))
        })?;
        Ok(Self { offset })
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Convert a UTC timestamp to the reporting timezone
    pub fn to_local(&self, utc_time: DateTime<Utc>) -> DateTime<FixedOffset> {
        utc_time.with_timezone(&self.offset)
    }

    /// The period containing `utc_time` in the reporting timezone
    pub fn period_at(&self, utc_time: DateTime<Utc>) -> PeriodKey {
        let local = self.to_local(utc_time);
        PeriodKey::new(local.year(), local.month())
    }

    /// The period containing "now"
    pub fn current_period(&self) -> PeriodKey {
        self.period_at(Utc::now())
    }
}
