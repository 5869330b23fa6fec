use std::sync::Arc;
use tracing::{info, warn};

use crate::core::PeriodKey;
use crate::modules::reports::models::MonthReport;
use crate::modules::sectors::models::Sector;
use crate::modules::sectors::repositories::SectorRepository;
use crate::modules::sectors::services::read_sectors;

/// Service for the full monthly report
pub struct ReportService {
    repo: Arc<dyn SectorRepository>,
}

impl ReportService {
    pub fn new(repo: Arc<dyn SectorRepository>) -> Self {
        Self { repo }
    }

    /// All raw rows of every sector for `period`.
    ///
    /// Rows are returned unaggregated and unpaginated. A sector whose read
    /// fails appears with no rows and is listed in the report status.
    pub async fn get_full_report(&self, period: PeriodKey) -> MonthReport {
        let reads = read_sectors(&Sector::ALL, |sector| {
            self.repo.find_by_period(sector, period)
        })
        .await;

        let status = reads.status();
        let report = MonthReport::new(period, reads.records, status);

        if report.status.degraded {
            warn!(
                period = %period,
                failed = ?report.status.failed_sectors,
                "Monthly report assembled with missing sectors"
            );
        } else {
            info!(period = %period, rows = report.row_count(), "Monthly report assembled");
        }

        report
    }
}
