use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use tracing::warn;

use crate::core::{PeriodKey, Result};
use crate::modules::sectors::models::{DirectoryKind, Sector, SectorRecord};
use crate::modules::sectors::repositories::SectorRepository;

/// Whether every sector read behind a result succeeded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataStatus {
    pub degraded: bool,
    pub failed_sectors: Vec<Sector>,
}

impl DataStatus {
    pub fn complete() -> Self {
        Self::default()
    }

    pub fn from_failures(mut failed_sectors: Vec<Sector>) -> Self {
        failed_sectors.sort();
        failed_sectors.dedup();
        Self {
            degraded: !failed_sectors.is_empty(),
            failed_sectors,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.degraded
    }
}

/// Rows gathered from several sectors, failed sectors left empty
#[derive(Debug, Clone, Default)]
pub struct SectorReads {
    pub records: BTreeMap<Sector, Vec<SectorRecord>>,
    pub failed: Vec<Sector>,
}

impl SectorReads {
    /// Rows of one sector; empty when it had none or its read failed
    pub fn rows(&self, sector: Sector) -> &[SectorRecord] {
        self.records.get(&sector).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn status(&self) -> DataStatus {
        DataStatus::from_failures(self.failed.clone())
    }
}

/// Runs one read per sector concurrently and waits for all of them.
///
/// A failing read never cancels the others: its sector is recorded as
/// failed and gets an empty row list.
pub async fn read_sectors<F, Fut>(sectors: &[Sector], read: F) -> SectorReads
where
    F: Fn(Sector) -> Fut,
    Fut: Future<Output = Result<Vec<SectorRecord>>>,
{
    let reads = sectors.iter().map(|&sector| {
        let pending = read(sector);
        async move { (sector, pending.await) }
    });

    let mut outcome = SectorReads::default();
    for (sector, result) in join_all(reads).await {
        match result {
            Ok(rows) => {
                outcome.records.insert(sector, rows);
            }
            Err(e) => {
                warn!(sector = %sector, error = %e, "Sector read failed, substituting empty rows");
                outcome.records.insert(sector, Vec::new());
                outcome.failed.push(sector);
            }
        }
    }

    outcome
}

/// Rows of `sector` in `from..=to`, a span of `months` periods.
///
/// Tenants and events can hold one row per directory entry and month, so
/// their row cap grows with the directory instead of stopping at the
/// descriptor's default.
pub async fn read_range(
    repo: &dyn SectorRepository,
    sector: Sector,
    from: PeriodKey,
    to: PeriodKey,
    months: usize,
) -> Result<Vec<SectorRecord>> {
    let mut limit = sector.descriptor().range_limit(months);
    if let Some(kind) = DirectoryKind::for_sector(sector) {
        let entries = repo.list_directory(kind).await?.len();
        let per_directory = u32::try_from(months)
            .unwrap_or(u32::MAX)
            .saturating_mul(u32::try_from(entries).unwrap_or(u32::MAX));
        limit = limit.max(per_directory);
    }

    repo.find_range(sector, from, to, limit).await
}
