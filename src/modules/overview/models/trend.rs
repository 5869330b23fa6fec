use serde::{Deserialize, Serialize};

use crate::modules::sectors::models::Sector;

use super::snapshot::OverviewSnapshot;
use super::variance::VarianceResult;

/// Variance of one sector against the previous month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorTrend {
    pub sector: Sector,
    pub variance: VarianceResult,
}

/// A month's overview next to the month before it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewTrend {
    pub current: OverviewSnapshot,
    pub previous: OverviewSnapshot,
    pub sectors: Vec<SectorTrend>,
    pub total: VarianceResult,
}

impl OverviewTrend {
    pub fn sector(&self, sector: Sector) -> Option<&SectorTrend> {
        self.sectors.iter().find(|trend| trend.sector == sector)
    }

    pub fn is_degraded(&self) -> bool {
        self.current.is_degraded() || self.previous.is_degraded()
    }
}
