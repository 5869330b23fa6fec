// In-process storage with the same upsert semantics as the MySQL tables.
// Backs the test suites and STORAGE_BACKEND=memory local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::{AppError, PeriodKey, Result};
use crate::modules::sectors::models::{
    DirectoryEntry, DirectoryKind, RecordDetail, Sector, SectorRecord,
};

use super::SectorRepository;

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    rows: HashMap<Sector, Vec<SectorRecord>>,
    directory: HashMap<DirectoryKind, Vec<DirectoryEntry>>,
}

impl Store {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn directory_name(&self, record: &SectorRecord) -> Option<String> {
        let (kind, id) = match &record.detail {
            RecordDetail::Tenant { tenant_id, .. } => (DirectoryKind::Tenants, tenant_id),
            RecordDetail::Event { event_id, .. } => (DirectoryKind::Events, event_id),
            _ => return None,
        };
        self.directory
            .get(&kind)
            .and_then(|entries| entries.iter().find(|entry| &entry.id == id))
            .map(|entry| entry.name.clone())
    }

    /// Fills the joined tenant/event name the way the SQL join does
    fn hydrate(&self, mut record: SectorRecord) -> SectorRecord {
        let name = self.directory_name(&record);
        match &mut record.detail {
            RecordDetail::Tenant { tenant_name, .. } => *tenant_name = name,
            RecordDetail::Event { event_name, .. } => *event_name = name,
            _ => {}
        }
        record
    }

    fn check_reference(&self, record: &SectorRecord) -> Result<()> {
        let (kind, id) = match &record.detail {
            RecordDetail::Tenant { tenant_id, .. } => (DirectoryKind::Tenants, tenant_id),
            RecordDetail::Event { event_id, .. } => (DirectoryKind::Events, event_id),
            _ => return Ok(()),
        };
        let known = self
            .directory
            .get(&kind)
            .is_some_and(|entries| entries.iter().any(|entry| &entry.id == id));
        if known {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Unknown {} '{}'",
                kind.as_str().trim_end_matches('s'),
                id
            )))
        }
    }

    /// Insert or update on the natural key; returns the stored row
    fn put(&mut self, record: &SectorRecord) -> SectorRecord {
        let key = record.natural_key();
        let sector = record.sector();
        let requested_id = record.id;
        let id = match requested_id {
            Some(id) => id,
            None => self.allocate_id(),
        };

        let rows = self.rows.entry(sector).or_default();
        let mut stored = record.clone();
        stored.detail = strip_names(stored.detail);

        if let Some(existing) = rows.iter_mut().find(|row| row.natural_key() == key) {
            stored.id = existing.id;
            *existing = stored.clone();
        } else {
            stored.id = Some(id);
            rows.push(stored.clone());
        }

        stored
    }
}

/// Names are never stored on rows; they come from the directory on read
fn strip_names(detail: RecordDetail) -> RecordDetail {
    match detail {
        RecordDetail::Tenant { tenant_id, .. } => RecordDetail::Tenant {
            tenant_id,
            tenant_name: None,
        },
        RecordDetail::Event { event_id, .. } => RecordDetail::Event {
            event_id,
            event_name: None,
        },
        other => other,
    }
}

fn newest_first(rows: &mut [SectorRecord]) {
    rows.sort_by(|a, b| b.period.cmp(&a.period).then(a.id.cmp(&b.id)));
}

/// Repository keeping all rows in memory
#[derive(Debug, Default)]
pub struct InMemorySectorRepository {
    store: RwLock<Store>,
}

impl InMemorySectorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store>> {
        self.store
            .read()
            .map_err(|_| AppError::internal("In-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store>> {
        self.store
            .write()
            .map_err(|_| AppError::internal("In-memory store lock poisoned"))
    }

    fn select<F>(&self, sector: Sector, filter: F) -> Result<Vec<SectorRecord>>
    where
        F: Fn(&SectorRecord) -> bool,
    {
        let store = self.read()?;
        let rows = store
            .rows
            .get(&sector)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filter(row))
                    .cloned()
                    .map(|row| store.hydrate(row))
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }
}

#[async_trait]
impl SectorRepository for InMemorySectorRepository {
    async fn find_by_period(&self, sector: Sector, period: PeriodKey) -> Result<Vec<SectorRecord>> {
        let mut rows = self.select(sector, |row| row.period == period)?;
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    async fn find_range(
        &self,
        sector: Sector,
        from: PeriodKey,
        to: PeriodKey,
        limit: u32,
    ) -> Result<Vec<SectorRecord>> {
        let mut rows = self.select(sector, |row| row.period >= from && row.period <= to)?;
        newest_first(&mut rows);
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn list(&self, sector: Sector) -> Result<Vec<SectorRecord>> {
        let mut rows = self.select(sector, |_| true)?;
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn upsert(&self, record: &SectorRecord) -> Result<SectorRecord> {
        let mut store = self.write()?;
        store.check_reference(record)?;

        if let Some(id) = record.id {
            let key = record.natural_key();
            let rows = store.rows.entry(record.sector()).or_default();
            if !rows.iter().any(|row| row.id == Some(id)) {
                return Err(AppError::not_found(format!(
                    "{} record {}",
                    record.sector(),
                    id
                )));
            }
            // same outcome as the UNIQUE index rejecting the UPDATE
            if rows
                .iter()
                .any(|row| row.id != Some(id) && row.natural_key() == key)
            {
                return Err(AppError::validation(format!(
                    "Another {} row already uses this period",
                    record.sector()
                )));
            }
            rows.retain(|row| row.id != Some(id));
        }

        let stored = store.put(record);
        Ok(store.hydrate(stored))
    }

    async fn replace_month(
        &self,
        sector: Sector,
        period: PeriodKey,
        records: &[SectorRecord],
    ) -> Result<Vec<SectorRecord>> {
        let mut store = self.write()?;
        for record in records {
            store.check_reference(record)?;
        }

        store
            .rows
            .entry(sector)
            .or_default()
            .retain(|row| row.period != period);

        let stored = records
            .iter()
            .map(|record| {
                let mut fresh = record.clone();
                fresh.id = None;
                store.put(&fresh)
            })
            .collect();

        Ok(stored)
    }

    async fn delete(&self, sector: Sector, id: i64) -> Result<()> {
        let mut store = self.write()?;
        let rows = store.rows.entry(sector).or_default();
        let before = rows.len();
        rows.retain(|row| row.id != Some(id));

        if rows.len() == before {
            return Err(AppError::not_found(format!("{} record {}", sector, id)));
        }

        Ok(())
    }

    async fn delete_month(&self, sector: Sector, period: PeriodKey) -> Result<u64> {
        let mut store = self.write()?;
        let rows = store.rows.entry(sector).or_default();
        let before = rows.len();
        rows.retain(|row| row.period != period);

        Ok((before - rows.len()) as u64)
    }

    async fn list_directory(&self, kind: DirectoryKind) -> Result<Vec<DirectoryEntry>> {
        let store = self.read()?;
        let mut entries = store.directory.get(&kind).cloned().unwrap_or_default();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn create_directory_entry(&self, kind: DirectoryKind, name: &str) -> Result<DirectoryEntry> {
        let entry = DirectoryEntry::new(name);
        let mut store = self.write()?;
        store.directory.entry(kind).or_default().push(entry.clone());
        Ok(entry)
    }

    async fn delete_directory_entry(&self, kind: DirectoryKind, id: &str) -> Result<()> {
        let mut store = self.write()?;
        let entries = store.directory.entry(kind).or_default();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);

        if entries.len() == before {
            return Err(AppError::not_found(format!("{} entry {}", kind, id)));
        }

        // Same effect as ON DELETE CASCADE
        store
            .rows
            .entry(kind.sector())
            .or_default()
            .retain(|row| row.line_key() != id);

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.read().map(|_| ())
    }
}
