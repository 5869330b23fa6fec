use serde::{Deserialize, Serialize};
use std::fmt;

/// Abbreviated month names used for chart labels (es-ES short format)
const MONTH_LABELS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Longest trailing window the evolution endpoints accept (ten years)
pub const MAX_WINDOW_MONTHS: usize = 120;

/// Identity of one monthly aggregation bucket.
///
/// Ordering is chronological: by year, then by month. Periods coming from
/// callers are not validated; a month outside 1..=12 simply never matches
/// any stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    pub year: i32,
    pub month: u32,
}

impl PeriodKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The calendar month immediately before this one
    pub fn previous(&self) -> Self {
        if self.month <= 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// The calendar month immediately after this one
    pub fn next(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// `count` consecutive periods ending at (and including) this one,
    /// in ascending order
    pub fn trailing(&self, count: usize) -> Vec<PeriodKey> {
        let mut periods: Vec<PeriodKey> = std::iter::successors(Some(*self), |p| Some(p.previous()))
            .take(count)
            .collect();
        periods.reverse();
        periods
    }

    /// January through December of `year`
    pub fn calendar_year(year: i32) -> Vec<PeriodKey> {
        (1..=12).map(|month| PeriodKey::new(year, month)).collect()
    }

    /// Month count since year 0, used for range comparisons in SQL
    pub fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month)
    }

    /// Whether the month is inside 1..=12
    pub fn is_valid_month(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    /// Short month label, identical format for every period
    pub fn label(&self) -> String {
        if self.is_valid_month() {
            MONTH_LABELS[(self.month - 1) as usize].to_string()
        } else {
            self.month.to_string()
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
