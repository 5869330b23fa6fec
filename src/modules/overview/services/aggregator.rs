use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::PeriodKey;
use crate::modules::overview::models::{
    OverviewSnapshot, OverviewTrend, SectorAmounts, SectorTrend,
};
use crate::modules::sectors::models::Sector;
use crate::modules::sectors::repositories::SectorRepository;
use crate::modules::sectors::services::{read_sectors, SectorReads};

use super::variance::VarianceCalculator;

/// Reduces one month of rows into per-sector net amounts
pub fn summarize(period: PeriodKey, reads: &SectorReads) -> OverviewSnapshot {
    let mut sectors = SectorAmounts::default();
    for sector in Sector::ALL {
        let descriptor = sector.descriptor();
        sectors.add(sector, descriptor.sum_net(reads.rows(sector)));
    }

    OverviewSnapshot::new(period, sectors, reads.status())
}

/// Monthly aggregator over every sector
pub struct OverviewService {
    repo: Arc<dyn SectorRepository>,
}

impl OverviewService {
    pub fn new(repo: Arc<dyn SectorRepository>) -> Self {
        Self { repo }
    }

    /// Net amount of each sector plus the grand total for `period`.
    ///
    /// Never fails: a sector whose read fails counts as zero and is listed
    /// in the snapshot status. Always re-reads storage.
    pub async fn get_overview(&self, period: PeriodKey) -> OverviewSnapshot {
        let reads = read_sectors(&Sector::ALL, |sector| {
            self.repo.find_by_period(sector, period)
        })
        .await;

        let snapshot = summarize(period, &reads);

        if snapshot.is_degraded() {
            warn!(
                period = %period,
                failed = ?snapshot.status.failed_sectors,
                "Overview computed with missing sectors"
            );
        } else {
            debug!(period = %period, total = %snapshot.total, "Overview computed");
        }

        snapshot
    }

    /// Overview of `period` with each sector's variance against the month before
    pub async fn get_overview_trend(&self, period: PeriodKey) -> OverviewTrend {
        let (current, previous) = futures_util::future::join(
            self.get_overview(period),
            self.get_overview(period.previous()),
        )
        .await;

        let sectors = Sector::ALL
            .iter()
            .map(|&sector| SectorTrend {
                sector,
                variance: VarianceCalculator::compare(
                    current.amount(sector),
                    previous.amount(sector),
                    sector.descriptor().allow_negative,
                ),
            })
            .collect();

        // The grand total includes food net, so it can go negative too
        let total = VarianceCalculator::compare(current.total, previous.total, true);

        OverviewTrend {
            current,
            previous,
            sectors,
            total,
        }
    }
}
