use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::PeriodKey;
use crate::modules::sectors::models::{Sector, SectorRecord};
use crate::modules::sectors::services::DataStatus;

/// Every raw row of one month, grouped by sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthReport {
    pub period: PeriodKey,
    /// Holds a key for every sector, possibly with no rows
    pub sectors: BTreeMap<Sector, Vec<SectorRecord>>,
    pub status: DataStatus,
}

impl MonthReport {
    pub fn new(
        period: PeriodKey,
        mut sectors: BTreeMap<Sector, Vec<SectorRecord>>,
        status: DataStatus,
    ) -> Self {
        for sector in Sector::ALL {
            sectors.entry(sector).or_default();
        }
        Self {
            period,
            sectors,
            status,
        }
    }

    pub fn rows(&self, sector: Sector) -> &[SectorRecord] {
        self.sectors.get(&sector).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn row_count(&self) -> usize {
        self.sectors.values().map(Vec::len).sum()
    }
}
