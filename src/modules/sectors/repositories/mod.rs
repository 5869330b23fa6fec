use async_trait::async_trait;

use crate::core::{PeriodKey, Result};
use crate::modules::sectors::models::{DirectoryEntry, DirectoryKind, Sector, SectorRecord};

pub mod memory;
pub mod mysql;

pub use memory::InMemorySectorRepository;
pub use mysql::MySqlSectorRepository;

/// Storage of per-sector monthly rows.
///
/// Reads return rows exactly as stored; nothing here aggregates. Writes
/// upsert on each table's natural key (period plus discipline, category,
/// tenant or event).
#[async_trait]
pub trait SectorRepository: Send + Sync {
    /// All rows of `sector` for one period
    async fn find_by_period(&self, sector: Sector, period: PeriodKey) -> Result<Vec<SectorRecord>>;

    /// Rows of `sector` with `from <= period <= to`, newest first, at most `limit` rows
    async fn find_range(
        &self,
        sector: Sector,
        from: PeriodKey,
        to: PeriodKey,
        limit: u32,
    ) -> Result<Vec<SectorRecord>>;

    /// Every row of `sector`, newest first
    async fn list(&self, sector: Sector) -> Result<Vec<SectorRecord>>;

    /// Insert or update on the natural key. A record carrying an id replaces
    /// that row and keeps the id.
    async fn upsert(&self, record: &SectorRecord) -> Result<SectorRecord>;

    /// Atomically drop every row of `sector` in `period` and store `records`
    async fn replace_month(
        &self,
        sector: Sector,
        period: PeriodKey,
        records: &[SectorRecord],
    ) -> Result<Vec<SectorRecord>>;

    /// Remove one row; `NotFound` when no row has that id
    async fn delete(&self, sector: Sector, id: i64) -> Result<()>;

    /// Remove every row of `sector` in `period`, returning how many went away
    async fn delete_month(&self, sector: Sector, period: PeriodKey) -> Result<u64>;

    /// Tenants or events ordered by name
    async fn list_directory(&self, kind: DirectoryKind) -> Result<Vec<DirectoryEntry>>;

    async fn create_directory_entry(&self, kind: DirectoryKind, name: &str) -> Result<DirectoryEntry>;

    /// Remove a tenant or event together with its monthly rows
    async fn delete_directory_entry(&self, kind: DirectoryKind, id: &str) -> Result<()>;

    /// Cheap round trip used by the readiness check
    async fn ping(&self) -> Result<()>;
}
