use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::core::error::AppError;
use crate::core::PeriodKey;
use crate::modules::sectors::models::{
    DirectoryEntry, DirectoryKind, ExpenseCategory, Sector, SectorRecord,
};
use crate::modules::sectors::repositories::SectorRepository;

/// Writes behind the management screens. Every write is validated first.
pub struct ManagementService {
    repo: Arc<dyn SectorRepository>,
}

impl ManagementService {
    pub fn new(repo: Arc<dyn SectorRepository>) -> Self {
        Self { repo }
    }

    /// Insert or update one row of `sector`
    pub async fn upsert_record(
        &self,
        sector: Sector,
        record: SectorRecord,
    ) -> Result<SectorRecord, AppError> {
        ensure_sector(sector, &record)?;
        record.validate()?;

        let saved = self.repo.upsert(&record).await?;

        info!(
            sector = %sector,
            period = %saved.period,
            line = %saved.line_key(),
            id = ?saved.id,
            "Record saved"
        );

        Ok(saved)
    }

    pub async fn delete_record(&self, sector: Sector, id: i64) -> Result<(), AppError> {
        self.repo.delete(sector, id).await?;
        info!(sector = %sector, id = id, "Record deleted");
        Ok(())
    }

    /// Every row of `sector`, newest first
    pub async fn list_records(&self, sector: Sector) -> Result<Vec<SectorRecord>, AppError> {
        self.repo.list(sector).await
    }

    /// Remove a whole month of `sector`; for food this clears income and expenses
    pub async fn delete_month(&self, sector: Sector, period: PeriodKey) -> Result<u64, AppError> {
        validate_period(period)?;
        let removed = self.repo.delete_month(sector, period).await?;
        info!(sector = %sector, period = %period, removed = removed, "Month deleted");
        Ok(removed)
    }

    /// Overwrite a food month: the income row plus all four expense categories.
    ///
    /// Categories missing from `expenses` are stored as zero.
    pub async fn replace_food_month(
        &self,
        period: PeriodKey,
        income: Decimal,
        expenses: &BTreeMap<ExpenseCategory, Decimal>,
    ) -> Result<Vec<SectorRecord>, AppError> {
        let mut records = vec![SectorRecord::food_income(period, income)];
        records.extend(ExpenseCategory::ALL.iter().map(|category| {
            let amount = expenses.get(category).copied().unwrap_or(Decimal::ZERO);
            SectorRecord::food_expense(period, *category, amount)
        }));

        for record in &records {
            record.validate()?;
        }

        let saved = self.repo.replace_month(Sector::Food, period, &records).await?;
        info!(period = %period, income = %income, "Food month replaced");
        Ok(saved)
    }

    /// Store one month of sports rows at once.
    ///
    /// All rows must be sports rows of the same month with distinct
    /// disciplines. Nothing is written unless every row is valid; the
    /// imported rows then replace whatever the month held.
    pub async fn import_sports_month(
        &self,
        rows: Vec<SectorRecord>,
    ) -> Result<Vec<SectorRecord>, AppError> {
        let period = rows
            .first()
            .map(|record| record.period)
            .ok_or_else(|| AppError::validation("import contains no rows"))?;

        let mut seen = HashSet::new();
        for record in &rows {
            ensure_sector(Sector::Sports, record)?;
            record.validate()?;

            if record.period != period {
                return Err(AppError::validation(format!(
                    "all imported rows must belong to {}, found {}",
                    period, record.period
                )));
            }
            if !seen.insert(record.line_key()) {
                return Err(AppError::validation(format!(
                    "{} appears more than once",
                    record.line_key()
                )));
            }
        }

        let saved = self.repo.replace_month(Sector::Sports, period, &rows).await?;
        info!(period = %period, rows = saved.len(), "Sports month imported");
        Ok(saved)
    }

    pub async fn list_directory(&self, kind: DirectoryKind) -> Result<Vec<DirectoryEntry>, AppError> {
        self.repo.list_directory(kind).await
    }

    pub async fn create_directory_entry(
        &self,
        kind: DirectoryKind,
        name: &str,
    ) -> Result<DirectoryEntry, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name is required"));
        }

        let entry = self.repo.create_directory_entry(kind, name).await?;
        info!(kind = %kind, id = %entry.id, name = %entry.name, "Directory entry created");
        Ok(entry)
    }

    /// Remove a tenant or event along with its monthly rows
    pub async fn delete_directory_entry(&self, kind: DirectoryKind, id: &str) -> Result<(), AppError> {
        self.repo.delete_directory_entry(kind, id).await?;
        info!(kind = %kind, id = %id, "Directory entry deleted");
        Ok(())
    }
}

fn ensure_sector(sector: Sector, record: &SectorRecord) -> Result<(), AppError> {
    if record.sector() != sector {
        return Err(AppError::validation(format!(
            "{} row sent to the {} sector",
            record.sector(),
            sector
        )));
    }
    Ok(())
}

fn validate_period(period: PeriodKey) -> Result<(), AppError> {
    if period.year < 2000 || !period.is_valid_month() {
        return Err(AppError::validation(format!("invalid period {}", period)));
    }
    Ok(())
}
