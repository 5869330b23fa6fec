use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::PeriodKey;
use crate::modules::sectors::services::DataStatus;

use super::snapshot::SectorAmounts;

/// One month of the evolution chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionPoint {
    pub period: PeriodKey,
    pub label: String,
    pub sectors: SectorAmounts,
    pub total: Decimal,
}

impl EvolutionPoint {
    pub fn new(period: PeriodKey, sectors: SectorAmounts) -> Self {
        Self {
            period,
            label: period.label(),
            total: sectors.total(),
            sectors,
        }
    }
}

/// Dense monthly series over a trailing window, oldest month first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionSeries {
    pub window: usize,
    pub points: Vec<EvolutionPoint>,
    pub status: DataStatus,
}

impl EvolutionSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Periods covered, in series order
    pub fn periods(&self) -> Vec<PeriodKey> {
        self.points.iter().map(|point| point.period).collect()
    }

    pub fn is_degraded(&self) -> bool {
        self.status.degraded
    }
}
