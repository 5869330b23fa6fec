use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::PeriodKey;
use crate::modules::overview::models::VarianceResult;

use super::sector::Sector;

/// One line of a sector dashboard breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownLine {
    /// Stable key: discipline, category, tenant/event id, "income" or "clothing"
    pub key: String,
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courts_rented: Option<i32>,
    /// Share of the month's total expense, food categories only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_percent: Option<Decimal>,
}

impl BreakdownLine {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
            courts_rented: None,
            share_percent: None,
        }
    }
}

/// Dashboard figures of a single sector for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorStats {
    pub sector: Sector,
    pub period: PeriodKey,
    pub income: Decimal,
    pub expense: Decimal,
    pub total: Decimal,
    pub previous_total: Decimal,
    pub variance: VarianceResult,
    pub breakdown: Vec<BreakdownLine>,
    /// The previous month could not be read and counts as zero
    pub previous_degraded: bool,
}

impl SectorStats {
    pub fn line(&self, key: &str) -> Option<&BreakdownLine> {
        self.breakdown.iter().find(|line| line.key == key)
    }
}

/// One month of a sector's per-line chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorEvolutionPoint {
    pub period: PeriodKey,
    pub label: String,
    pub total: Decimal,
    pub lines: Vec<BreakdownLine>,
}

impl SectorEvolutionPoint {
    pub fn line(&self, key: &str) -> Option<&BreakdownLine> {
        self.lines.iter().find(|line| line.key == key)
    }
}

/// Dense monthly series of one sector, oldest month first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorEvolution {
    pub sector: Sector,
    pub points: Vec<SectorEvolutionPoint>,
}
