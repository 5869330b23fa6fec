use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::timezone::ReportClock;
use crate::core::{PeriodKey, MAX_WINDOW_MONTHS};
use crate::modules::overview::models::{EvolutionPoint, EvolutionSeries, SectorAmounts};
use crate::modules::sectors::models::Sector;
use crate::modules::sectors::repositories::SectorRepository;
use crate::modules::sectors::services::{read_range, read_sectors, SectorReads};

/// Builds the monthly series shown in the evolution charts
pub struct EvolutionService {
    repo: Arc<dyn SectorRepository>,
    clock: ReportClock,
}

impl EvolutionService {
    pub fn new(repo: Arc<dyn SectorRepository>, clock: ReportClock) -> Self {
        Self { repo, clock }
    }

    /// Series of `window` months ending at the current month in the
    /// reporting timezone
    pub async fn get_evolution(&self, window: usize) -> EvolutionSeries {
        self.build(window, self.clock.current_period()).await
    }

    /// Series of `window` months ending at `anchor`, oldest first.
    ///
    /// The window is clamped to `1..=MAX_WINDOW_MONTHS`.
    pub async fn build(&self, window: usize, anchor: PeriodKey) -> EvolutionSeries {
        let window = window.clamp(1, MAX_WINDOW_MONTHS);
        self.collect(&anchor.trailing(window)).await
    }

    /// January to December of `year`, months without rows at zero
    pub async fn build_year(&self, year: i32) -> EvolutionSeries {
        self.collect(&PeriodKey::calendar_year(year)).await
    }

    /// One batched read per sector over the contiguous `periods`
    async fn collect(&self, periods: &[PeriodKey]) -> EvolutionSeries {
        let (first, last) = match (periods.first(), periods.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return assemble(0, periods, &SectorReads::default()),
        };
        let window = periods.len();

        let reads = read_sectors(&Sector::ALL, |sector| {
            read_range(self.repo.as_ref(), sector, first, last, window)
        })
        .await;

        let series = assemble(window, periods, &reads);

        if series.is_degraded() {
            warn!(
                window = window,
                from = %first,
                to = %last,
                failed = ?series.status.failed_sectors,
                "Evolution built with missing sectors"
            );
        } else {
            debug!(window = window, from = %first, to = %last, "Evolution built");
        }

        series
    }
}

/// Groups batched rows into one point per target period.
///
/// Rows whose period is not one of `periods` are dropped.
pub fn assemble(window: usize, periods: &[PeriodKey], reads: &SectorReads) -> EvolutionSeries {
    let mut buckets: HashMap<PeriodKey, SectorAmounts> = periods
        .iter()
        .map(|&period| (period, SectorAmounts::default()))
        .collect();

    for sector in Sector::ALL {
        let descriptor = sector.descriptor();
        for record in reads.rows(sector) {
            if let Some(amounts) = buckets.get_mut(&record.period) {
                amounts.add(sector, descriptor.net_amount(record));
            }
        }
    }

    let mut points: Vec<EvolutionPoint> = buckets
        .into_iter()
        .map(|(period, sectors)| EvolutionPoint::new(period, sectors))
        .collect();
    points.sort_by_key(|point| point.period);

    EvolutionSeries {
        window,
        points,
        status: reads.status(),
    }
}
