use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::core::error::AppError;
use crate::core::money::round_amount;
use crate::core::PeriodKey;
use crate::modules::overview::services::VarianceCalculator;
use crate::modules::sectors::models::{
    BreakdownLine, DirectoryEntry, DirectoryKind, ExpenseCategory, RecordDetail, Sector,
    SectorEvolution, SectorEvolutionPoint, SectorRecord, SectorStats, SportDiscipline,
};
use crate::modules::sectors::repositories::SectorRepository;

use super::fanout::read_range;

/// Which lines a sector's breakdown lists
#[derive(Debug, Clone)]
enum LineCatalog {
    /// The three disciplines, with courts rented
    Sports,
    /// Income plus the four expense categories with their share
    Food,
    /// A single line
    Clothing,
    /// One line per tenant or event
    Directory(Vec<DirectoryEntry>),
}

impl LineCatalog {
    fn lines(&self, rows: &[SectorRecord]) -> Vec<BreakdownLine> {
        match self {
            LineCatalog::Sports => sports_lines(rows),
            LineCatalog::Food => food_lines(rows),
            LineCatalog::Clothing => {
                let mut line = BreakdownLine::new("clothing", "Indumentaria");
                line.income = rows.iter().map(|record| record.income).sum();
                vec![line]
            }
            LineCatalog::Directory(entries) => directory_lines(
                rows,
                entries.iter().map(|entry| (entry.id.as_str(), entry.name.as_str())),
            ),
        }
    }
}

/// Per-sector dashboard figures
pub struct SectorStatsService {
    repo: Arc<dyn SectorRepository>,
}

impl SectorStatsService {
    pub fn new(repo: Arc<dyn SectorRepository>) -> Self {
        Self { repo }
    }

    async fn catalog(&self, sector: Sector) -> Result<LineCatalog, AppError> {
        let kind = match sector {
            Sector::Sports => return Ok(LineCatalog::Sports),
            Sector::Food => return Ok(LineCatalog::Food),
            Sector::Clothing => return Ok(LineCatalog::Clothing),
            Sector::Tenants => DirectoryKind::Tenants,
            Sector::Events => DirectoryKind::Events,
        };
        Ok(LineCatalog::Directory(self.repo.list_directory(kind).await?))
    }

    /// Totals, breakdown and month-over-month variance of one sector.
    ///
    /// A failed read of `period` is returned as an error. A failed read of
    /// the month before only zeroes `previous_total`.
    pub async fn get_sector_stats(
        &self,
        sector: Sector,
        period: PeriodKey,
    ) -> Result<SectorStats, AppError> {
        let previous_period = period.previous();
        let (current, previous) = futures_util::future::join(
            self.repo.find_by_period(sector, period),
            self.repo.find_by_period(sector, previous_period),
        )
        .await;

        let current = current?;
        let descriptor = sector.descriptor();

        let (previous_total, previous_degraded) = match previous {
            Ok(rows) => (descriptor.sum_net(&rows), false),
            Err(e) => {
                warn!(
                    sector = %sector,
                    period = %previous_period,
                    error = %e,
                    "Previous month unavailable, comparing against zero"
                );
                (Decimal::ZERO, true)
            }
        };

        let breakdown = self.catalog(sector).await?.lines(&current);

        let income: Decimal = current.iter().map(|record| record.income).sum();
        let expense: Decimal = current.iter().map(|record| record.expense).sum();
        let total = descriptor.sum_net(&current);

        debug!(sector = %sector, period = %period, total = %total, "Sector stats computed");

        Ok(SectorStats {
            sector,
            period,
            income,
            expense,
            total,
            previous_total,
            variance: VarianceCalculator::compare(total, previous_total, descriptor.allow_negative),
            breakdown,
            previous_degraded,
        })
    }

    /// Breakdown of one sector for each of the contiguous `periods`.
    ///
    /// One batched read covers the whole span; months without rows list
    /// every line at zero. Read failures are returned as errors.
    pub async fn get_sector_evolution(
        &self,
        sector: Sector,
        periods: &[PeriodKey],
    ) -> Result<SectorEvolution, AppError> {
        let (first, last) = match (periods.first(), periods.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => {
                return Ok(SectorEvolution {
                    sector,
                    points: Vec::new(),
                })
            }
        };

        let (rows, catalog) = futures_util::future::join(
            read_range(self.repo.as_ref(), sector, first, last, periods.len()),
            self.catalog(sector),
        )
        .await;
        let (rows, catalog) = (rows?, catalog?);

        let mut by_period: HashMap<PeriodKey, Vec<SectorRecord>> = HashMap::new();
        for record in rows {
            by_period.entry(record.period).or_default().push(record);
        }

        let descriptor = sector.descriptor();
        let mut points: Vec<SectorEvolutionPoint> = periods
            .iter()
            .map(|&period| {
                let month = by_period.remove(&period).unwrap_or_default();
                SectorEvolutionPoint {
                    period,
                    label: period.label(),
                    total: descriptor.sum_net(&month),
                    lines: catalog.lines(&month),
                }
            })
            .collect();
        points.sort_by_key(|point| point.period);

        debug!(sector = %sector, from = %first, to = %last, "Sector evolution built");

        Ok(SectorEvolution { sector, points })
    }
}

fn sports_lines(rows: &[SectorRecord]) -> Vec<BreakdownLine> {
    SportDiscipline::ALL
        .iter()
        .map(|discipline| {
            let mut line = BreakdownLine::new(discipline.as_str(), discipline.display_name());
            let mut courts = 0;
            for record in rows {
                if let RecordDetail::Sport {
                    discipline: d,
                    courts_rented,
                } = &record.detail
                {
                    if d == discipline {
                        line.income += record.income;
                        courts += courts_rented;
                    }
                }
            }
            line.courts_rented = Some(courts);
            line
        })
        .collect()
}

fn food_lines(rows: &[SectorRecord]) -> Vec<BreakdownLine> {
    let total_expense: Decimal = rows.iter().map(|record| record.expense).sum();
    // avoid dividing by zero on months without expenses
    let divisor = if total_expense.is_zero() {
        Decimal::ONE
    } else {
        total_expense
    };

    let mut income = BreakdownLine::new("income", "Ingresos");
    income.income = rows
        .iter()
        .filter(|record| matches!(record.detail, RecordDetail::FoodIncome))
        .map(|record| record.income)
        .sum();

    let categories = ExpenseCategory::ALL.iter().map(|category| {
        let mut line = BreakdownLine::new(category.as_str(), category.display_name());
        line.expense = rows
            .iter()
            .filter(|record| {
                matches!(&record.detail, RecordDetail::FoodExpense { category: c } if c == category)
            })
            .map(|record| record.expense)
            .sum();
        line.share_percent = Some(round_amount(line.expense / divisor * Decimal::ONE_HUNDRED));
        line
    });

    std::iter::once(income).chain(categories).collect()
}

/// One line per tenant or event, zero when it has no row this month
fn directory_lines<'a, I>(rows: &[SectorRecord], directory: I) -> Vec<BreakdownLine>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    directory
        .into_iter()
        .map(|(id, name)| {
            let mut line = BreakdownLine::new(id, name);
            line.income = rows
                .iter()
                .filter(|record| record.line_key() == id)
                .map(|record| record.income)
                .sum();
            line
        })
        .collect()
}
