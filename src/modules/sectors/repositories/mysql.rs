// MySQL storage for sector rows
//
// Every sector table is read through one SELECT shape (id, year, month,
// line, ref_name, units, income, expense) so a single row type maps all
// of them back to SectorRecord.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::mysql::MySqlArguments;
use sqlx::query::Query;
use sqlx::{FromRow, MySql, MySqlPool};
use tracing::debug;

use crate::core::{AppError, PeriodKey, Result};
use crate::modules::sectors::models::{
    DirectoryEntry, DirectoryKind, ExpenseCategory, RecordDetail, Sector, SectorRecord,
};

use super::SectorRepository;

/// Line value marking the income row of a food month
const FOOD_INCOME_LINE: &str = "income";

#[derive(Debug, FromRow)]
struct SectorRow {
    id: i64,
    year: i32,
    month: i32,
    line: String,
    ref_name: Option<String>,
    units: i64,
    income: Decimal,
    expense: Decimal,
}

impl SectorRow {
    fn into_record(self, sector: Sector) -> Result<SectorRecord> {
        let period = PeriodKey::new(self.year, u32::try_from(self.month).unwrap_or(0));

        let detail = match sector {
            Sector::Sports => RecordDetail::Sport {
                discipline: self.line.parse().map_err(AppError::Internal)?,
                courts_rented: i32::try_from(self.units).unwrap_or(i32::MAX),
            },
            Sector::Food if self.line == FOOD_INCOME_LINE => RecordDetail::FoodIncome,
            Sector::Food => RecordDetail::FoodExpense {
                category: self.line.parse::<ExpenseCategory>().map_err(AppError::Internal)?,
            },
            Sector::Clothing => RecordDetail::Clothing,
            Sector::Tenants => RecordDetail::Tenant {
                tenant_id: self.line,
                tenant_name: self.ref_name,
            },
            Sector::Events => RecordDetail::Event {
                event_id: self.line,
                event_name: self.ref_name,
            },
        };

        Ok(SectorRecord {
            id: Some(self.id),
            period,
            income: self.income,
            expense: self.expense,
            detail,
        })
    }
}

fn table_name(sector: Sector) -> &'static str {
    match sector {
        Sector::Sports => "sports_stats",
        Sector::Food => "food_stats",
        Sector::Clothing => "clothing_stats",
        Sector::Tenants => "tenant_monthly_income",
        Sector::Events => "event_monthly_income",
    }
}

fn directory_table(kind: DirectoryKind) -> &'static str {
    match kind {
        DirectoryKind::Tenants => "tenants",
        DirectoryKind::Events => "events",
    }
}

/// SELECT producing the shared row shape, table aliased as `s`
fn base_select(sector: Sector) -> &'static str {
    match sector {
        Sector::Sports => {
            r#"
            SELECT s.id, s.year, s.month, s.sport AS line, CAST(NULL AS CHAR) AS ref_name,
                   CAST(s.courts_rented AS SIGNED) AS units,
                   s.total_income AS income, CAST(0 AS DECIMAL(14,2)) AS expense
            FROM sports_stats s
            "#
        }
        Sector::Food => {
            r#"
            SELECT s.id, s.year, s.month, s.line, CAST(NULL AS CHAR) AS ref_name,
                   CAST(0 AS SIGNED) AS units,
                   CASE WHEN s.line = 'income' THEN s.amount ELSE CAST(0 AS DECIMAL(14,2)) END AS income,
                   CASE WHEN s.line = 'income' THEN CAST(0 AS DECIMAL(14,2)) ELSE s.amount END AS expense
            FROM food_stats s
            "#
        }
        Sector::Clothing => {
            r#"
            SELECT s.id, s.year, s.month, CAST('clothing' AS CHAR) AS line, CAST(NULL AS CHAR) AS ref_name,
                   CAST(0 AS SIGNED) AS units,
                   s.total_income AS income, CAST(0 AS DECIMAL(14,2)) AS expense
            FROM clothing_stats s
            "#
        }
        Sector::Tenants => {
            r#"
            SELECT s.id, s.year, s.month, s.tenant_id AS line, t.name AS ref_name,
                   CAST(0 AS SIGNED) AS units,
                   s.total_income AS income, CAST(0 AS DECIMAL(14,2)) AS expense
            FROM tenant_monthly_income s
            LEFT JOIN tenants t ON t.id = s.tenant_id
            "#
        }
        Sector::Events => {
            r#"
            SELECT s.id, s.year, s.month, s.event_id AS line, e.name AS ref_name,
                   CAST(0 AS SIGNED) AS units,
                   s.total_income AS income, CAST(0 AS DECIMAL(14,2)) AS expense
            FROM event_monthly_income s
            LEFT JOIN events e ON e.id = s.event_id
            "#
        }
    }
}

/// Natural-key upsert for one record. A NULL id lets AUTO_INCREMENT pick one;
/// `LAST_INSERT_ID(id)` makes the affected row's id readable on update too.
fn upsert_query(record: &SectorRecord) -> Query<'_, MySql, MySqlArguments> {
    let period = record.period;
    match &record.detail {
        RecordDetail::Sport {
            discipline,
            courts_rented,
        } => sqlx::query(
            r#"
            INSERT INTO sports_stats (id, year, month, sport, courts_rented, total_income)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                courts_rented = VALUES(courts_rented),
                total_income = VALUES(total_income),
                id = LAST_INSERT_ID(id)
            "#,
        )
        .bind(record.id)
        .bind(period.year)
        .bind(period.month)
        .bind(discipline.as_str())
        .bind(*courts_rented)
        .bind(record.income),
        RecordDetail::FoodIncome | RecordDetail::FoodExpense { .. } => {
            let (line, amount) = match &record.detail {
                RecordDetail::FoodExpense { category } => (category.as_str(), record.expense),
                _ => (FOOD_INCOME_LINE, record.income),
            };
            sqlx::query(
                r#"
                INSERT INTO food_stats (id, year, month, line, amount)
                VALUES (?, ?, ?, ?, ?)
                ON DUPLICATE KEY UPDATE
                    amount = VALUES(amount),
                    id = LAST_INSERT_ID(id)
                "#,
            )
            .bind(record.id)
            .bind(period.year)
            .bind(period.month)
            .bind(line)
            .bind(amount)
        }
        RecordDetail::Clothing => sqlx::query(
            r#"
            INSERT INTO clothing_stats (id, year, month, total_income)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                total_income = VALUES(total_income),
                id = LAST_INSERT_ID(id)
            "#,
        )
        .bind(record.id)
        .bind(period.year)
        .bind(period.month)
        .bind(record.income),
        RecordDetail::Tenant { tenant_id, .. } => sqlx::query(
            r#"
            INSERT INTO tenant_monthly_income (id, tenant_id, year, month, total_income)
            VALUES (?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                total_income = VALUES(total_income),
                id = LAST_INSERT_ID(id)
            "#,
        )
        .bind(record.id)
        .bind(tenant_id.as_str())
        .bind(period.year)
        .bind(period.month)
        .bind(record.income),
        RecordDetail::Event { event_id, .. } => sqlx::query(
            r#"
            INSERT INTO event_monthly_income (id, event_id, year, month, total_income)
            VALUES (?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                total_income = VALUES(total_income),
                id = LAST_INSERT_ID(id)
            "#,
        )
        .bind(record.id)
        .bind(event_id.as_str())
        .bind(period.year)
        .bind(period.month)
        .bind(record.income),
    }
}

/// Maps constraint failures on write to caller-facing errors
fn map_write_error(record: &SectorRecord, e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return match &record.detail {
                RecordDetail::Tenant { tenant_id, .. } => {
                    AppError::validation(format!("Unknown tenant '{}'", tenant_id))
                }
                RecordDetail::Event { event_id, .. } => {
                    AppError::validation(format!("Unknown event '{}'", event_id))
                }
                _ => AppError::validation("Referenced entity does not exist"),
            };
        }
        if db_err.is_unique_violation() {
            return AppError::validation(format!(
                "Another {} row already uses this period",
                record.sector()
            ));
        }
    }
    AppError::Database(e)
}

/// Repository for sector rows backed by MySQL
#[derive(Clone)]
pub struct MySqlSectorRepository {
    pool: MySqlPool,
}

impl MySqlSectorRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, sector: Sector, sql: String, binds: RowFilter) -> Result<Vec<SectorRecord>> {
        let query = sqlx::query_as::<_, SectorRow>(&sql);
        let query = match binds {
            RowFilter::Period(period) => query.bind(period.year).bind(period.month),
            RowFilter::Range { from, to, limit } => {
                query.bind(from.ordinal()).bind(to.ordinal()).bind(limit)
            }
            RowFilter::All => query,
        };

        let rows = query.fetch_all(&self.pool).await?;

        rows.into_iter().map(|row| row.into_record(sector)).collect()
    }
}

enum RowFilter {
    Period(PeriodKey),
    Range { from: PeriodKey, to: PeriodKey, limit: u32 },
    All,
}

#[async_trait]
impl SectorRepository for MySqlSectorRepository {
    async fn find_by_period(&self, sector: Sector, period: PeriodKey) -> Result<Vec<SectorRecord>> {
        let sql = format!(
            "{} WHERE s.year = ? AND s.month = ? ORDER BY s.id",
            base_select(sector)
        );
        self.fetch(sector, sql, RowFilter::Period(period)).await
    }

    async fn find_range(
        &self,
        sector: Sector,
        from: PeriodKey,
        to: PeriodKey,
        limit: u32,
    ) -> Result<Vec<SectorRecord>> {
        let sql = format!(
            "{} WHERE (s.year * 12 + s.month) BETWEEN ? AND ? \
             ORDER BY s.year DESC, s.month DESC, s.id LIMIT ?",
            base_select(sector)
        );
        self.fetch(sector, sql, RowFilter::Range { from, to, limit }).await
    }

    async fn list(&self, sector: Sector) -> Result<Vec<SectorRecord>> {
        let sql = format!(
            "{} ORDER BY s.year DESC, s.month DESC, s.id",
            base_select(sector)
        );
        self.fetch(sector, sql, RowFilter::All).await
    }

    async fn upsert(&self, record: &SectorRecord) -> Result<SectorRecord> {
        let mut tx = self.pool.begin().await?;

        if let Some(id) = record.id {
            // Replacing by id: the old row goes first so a changed natural key
            // does not leave it behind
            let sql = format!("DELETE FROM {} WHERE id = ?", table_name(record.sector()));
            let deleted = sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
            if deleted.rows_affected() == 0 {
                return Err(AppError::not_found(format!(
                    "{} record {}",
                    record.sector(),
                    id
                )));
            }
        }

        let result = upsert_query(record)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(record, e))?;

        tx.commit().await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| AppError::internal("Row id out of range"))?;

        debug!(sector = %record.sector(), period = %record.period, id, "Upserted sector row");

        let mut stored = record.clone();
        stored.id = Some(id);
        Ok(stored)
    }

    async fn replace_month(
        &self,
        sector: Sector,
        period: PeriodKey,
        records: &[SectorRecord],
    ) -> Result<Vec<SectorRecord>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "DELETE FROM {} WHERE year = ? AND month = ?",
            table_name(sector)
        );
        sqlx::query(&sql)
            .bind(period.year)
            .bind(period.month)
            .execute(&mut *tx)
            .await?;

        let mut stored = Vec::with_capacity(records.len());
        for record in records {
            let mut fresh = record.clone();
            fresh.id = None;

            let result = upsert_query(&fresh)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_write_error(&fresh, e))?;

            fresh.id = i64::try_from(result.last_insert_id()).ok();
            stored.push(fresh);
        }

        tx.commit().await?;

        Ok(stored)
    }

    async fn delete(&self, sector: Sector, id: i64) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", table_name(sector));
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("{} record {}", sector, id)));
        }

        Ok(())
    }

    async fn delete_month(&self, sector: Sector, period: PeriodKey) -> Result<u64> {
        let sql = format!(
            "DELETE FROM {} WHERE year = ? AND month = ?",
            table_name(sector)
        );
        let result = sqlx::query(&sql)
            .bind(period.year)
            .bind(period.month)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_directory(&self, kind: DirectoryKind) -> Result<Vec<DirectoryEntry>> {
        let sql = format!(
            "SELECT id, name FROM {} ORDER BY name ASC",
            directory_table(kind)
        );
        let entries = sqlx::query_as::<_, DirectoryEntry>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    async fn create_directory_entry(&self, kind: DirectoryKind, name: &str) -> Result<DirectoryEntry> {
        let entry = DirectoryEntry::new(name);
        let sql = format!("INSERT INTO {} (id, name) VALUES (?, ?)", directory_table(kind));

        sqlx::query(&sql)
            .bind(&entry.id)
            .bind(&entry.name)
            .execute(&self.pool)
            .await?;

        Ok(entry)
    }

    async fn delete_directory_entry(&self, kind: DirectoryKind, id: &str) -> Result<()> {
        // Monthly rows go with the entry through ON DELETE CASCADE
        let sql = format!("DELETE FROM {} WHERE id = ?", directory_table(kind));
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("{} entry {}", kind, id)));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
