use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ReportingSettings;
use crate::core::error::AppError;
use crate::core::money::format_amount;
use crate::core::{PeriodKey, PeriodQuery};
use crate::modules::overview::controllers::DashboardCache;
use crate::modules::overview::controllers::overview_controller::{validate_window, VarianceResponse};
use crate::modules::sectors::models::{
    BreakdownLine, ExpenseCategory, RecordDetail, Sector, SectorEvolution, SectorEvolutionPoint,
    SectorRecord, SectorStats, SportDiscipline,
};
use crate::modules::sectors::services::{ManagementService, SectorStatsService};

/// Row of any sector as sent by the management screens.
///
/// Which optional fields apply depends on the sector: `discipline` and
/// `courts_rented` for sports, `category` for food expenses, `tenant_id`
/// or `event_id` for the directory sectors.
#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub income: Option<Decimal>,
    #[serde(default)]
    pub expense: Option<Decimal>,
    #[serde(default)]
    pub discipline: Option<String>,
    #[serde(default)]
    pub courts_rented: Option<i32>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
}

impl RecordRequest {
    pub fn into_record(self, sector: Sector) -> Result<SectorRecord, AppError> {
        let period = PeriodKey::new(self.year, self.month);
        let income = self.income.unwrap_or(Decimal::ZERO);

        let mut record = match sector {
            Sector::Sports => {
                let discipline = required(self.discipline, "discipline")?
                    .parse::<SportDiscipline>()
                    .map_err(AppError::Validation)?;
                SectorRecord::sport(period, discipline, self.courts_rented.unwrap_or(0), income)
            }
            Sector::Food => match self.category {
                Some(category) => {
                    let category = category
                        .parse::<ExpenseCategory>()
                        .map_err(AppError::Validation)?;
                    let mut record = SectorRecord::food_expense(
                        period,
                        category,
                        self.expense.unwrap_or(Decimal::ZERO),
                    );
                    record.income = income;
                    record
                }
                None => SectorRecord::food_income(period, income),
            },
            Sector::Clothing => SectorRecord::clothing(period, income),
            Sector::Tenants => SectorRecord::tenant(period, required(self.tenant_id, "tenant_id")?, income),
            Sector::Events => SectorRecord::event(period, required(self.event_id, "event_id")?, income),
        };

        // rejected by validation unless the row kind carries expenses
        if !matches!(record.detail, RecordDetail::FoodExpense { .. }) {
            record.expense = self.expense.unwrap_or(Decimal::ZERO);
        }
        record.id = self.id;
        Ok(record)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::validation(format!("{} is required", field)))
}

/// Body of `PUT /sectors/food/months`
#[derive(Debug, Deserialize)]
pub struct ReplaceFoodMonthRequest {
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    #[serde(default)]
    pub expenses: BTreeMap<ExpenseCategory, Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct SportImportRow {
    /// Stored key or display name, e.g. "Padel Indoor"
    pub sport: String,
    #[serde(default)]
    pub courts_rented: i32,
    pub income: Decimal,
}

/// Body of `POST /sectors/sports/import`
#[derive(Debug, Deserialize)]
pub struct SportImportRequest {
    pub year: i32,
    pub month: u32,
    pub rows: Vec<SportImportRow>,
}

impl SportImportRequest {
    pub fn into_records(self) -> Result<Vec<SectorRecord>, AppError> {
        let period = PeriodKey::new(self.year, self.month);
        self.rows
            .into_iter()
            .map(|row| {
                let discipline = row
                    .sport
                    .parse::<SportDiscipline>()
                    .map_err(AppError::Validation)?;
                Ok(SectorRecord::sport(period, discipline, row.courts_rented, row.income))
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct SectorRecordResponse {
    pub id: Option<i64>,
    pub sector: Sector,
    pub year: i32,
    pub month: u32,
    pub line: String,
    pub name: Option<String>,
    pub income: String,
    pub expense: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courts_rented: Option<i32>,
}

impl From<SectorRecord> for SectorRecordResponse {
    fn from(record: SectorRecord) -> Self {
        let (name, courts_rented) = match &record.detail {
            RecordDetail::Sport {
                discipline,
                courts_rented,
            } => (Some(discipline.display_name().to_string()), Some(*courts_rented)),
            RecordDetail::FoodIncome => (None, None),
            RecordDetail::FoodExpense { category } => (Some(category.display_name().to_string()), None),
            RecordDetail::Clothing => (None, None),
            RecordDetail::Tenant { tenant_name, .. } => (tenant_name.clone(), None),
            RecordDetail::Event { event_name, .. } => (event_name.clone(), None),
        };

        Self {
            id: record.id,
            sector: record.sector(),
            year: record.period.year,
            month: record.period.month,
            line: record.line_key(),
            name,
            income: format_amount(record.income),
            expense: format_amount(record.expense),
            courts_rented,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BreakdownLineResponse {
    pub key: String,
    pub label: String,
    pub income: String,
    pub expense: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courts_rented: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_percent: Option<String>,
}

impl From<BreakdownLine> for BreakdownLineResponse {
    fn from(line: BreakdownLine) -> Self {
        Self {
            key: line.key,
            label: line.label,
            income: format_amount(line.income),
            expense: format_amount(line.expense),
            courts_rented: line.courts_rented,
            share_percent: line.share_percent.map(format_amount),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SectorStatsResponse {
    pub sector: Sector,
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub income: String,
    pub expense: String,
    pub total: String,
    pub previous_total: String,
    pub variance: VarianceResponse,
    pub breakdown: Vec<BreakdownLineResponse>,
    pub degraded: bool,
}

impl From<SectorStats> for SectorStatsResponse {
    fn from(stats: SectorStats) -> Self {
        Self {
            sector: stats.sector,
            year: stats.period.year,
            month: stats.period.month,
            label: stats.period.label(),
            income: format_amount(stats.income),
            expense: format_amount(stats.expense),
            total: format_amount(stats.total),
            previous_total: format_amount(stats.previous_total),
            variance: stats.variance.into(),
            breakdown: stats.breakdown.into_iter().map(Into::into).collect(),
            degraded: stats.previous_degraded,
        }
    }
}

/// Either a calendar year or a trailing window ending this month
#[derive(Debug, Deserialize)]
pub struct SectorEvolutionQuery {
    pub year: Option<i32>,
    pub range: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SectorEvolutionPointResponse {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub total: String,
    pub lines: Vec<BreakdownLineResponse>,
}

impl From<SectorEvolutionPoint> for SectorEvolutionPointResponse {
    fn from(point: SectorEvolutionPoint) -> Self {
        Self {
            year: point.period.year,
            month: point.period.month,
            label: point.label,
            total: format_amount(point.total),
            lines: point.lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SectorEvolutionResponse {
    pub sector: Sector,
    pub points: Vec<SectorEvolutionPointResponse>,
}

impl From<SectorEvolution> for SectorEvolutionResponse {
    fn from(evolution: SectorEvolution) -> Self {
        Self {
            sector: evolution.sector,
            points: evolution.points.into_iter().map(Into::into).collect(),
        }
    }
}

pub(crate) fn parse_sector(raw: &str) -> Result<Sector, AppError> {
    Sector::from_str(raw).map_err(AppError::NotFound)
}

/// Dashboard of one sector
/// GET /sectors/{sector}/stats?year=&month=
pub async fn get_stats(
    service: web::Data<Arc<SectorStatsService>>,
    settings: web::Data<ReportingSettings>,
    path: web::Path<String>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let sector = parse_sector(&path)?;
    let period = query.resolve(&settings.clock)?;

    let stats = service.get_sector_stats(sector, period).await?;

    Ok(HttpResponse::Ok().json(SectorStatsResponse::from(stats)))
}

/// Monthly breakdown lines of one sector
/// GET /sectors/{sector}/evolution?year= or ?range=N
pub async fn get_evolution(
    service: web::Data<Arc<SectorStatsService>>,
    settings: web::Data<ReportingSettings>,
    path: web::Path<String>,
    query: web::Query<SectorEvolutionQuery>,
) -> Result<HttpResponse, AppError> {
    let sector = parse_sector(&path)?;
    let periods = match query.year {
        Some(year) => PeriodKey::calendar_year(year),
        None => {
            let window = validate_window(query.range.unwrap_or(settings.default_range))?;
            settings.clock.current_period().trailing(window)
        }
    };

    let evolution = service.get_sector_evolution(sector, &periods).await?;

    Ok(HttpResponse::Ok().json(SectorEvolutionResponse::from(evolution)))
}

/// Every stored row of a sector, newest first
/// GET /sectors/{sector}/records
pub async fn list_records(
    service: web::Data<Arc<ManagementService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let sector = parse_sector(&path)?;
    let records = service.list_records(sector).await?;

    let response: Vec<SectorRecordResponse> = records.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// Insert or update one row
/// PUT /sectors/{sector}/records
pub async fn upsert_record(
    service: web::Data<Arc<ManagementService>>,
    cache: web::Data<Arc<DashboardCache>>,
    path: web::Path<String>,
    request: web::Json<RecordRequest>,
) -> Result<HttpResponse, AppError> {
    let sector = parse_sector(&path)?;
    let record = request.into_inner().into_record(sector)?;

    let saved = service.upsert_record(sector, record).await?;
    cache.invalidate().await;

    Ok(HttpResponse::Ok().json(SectorRecordResponse::from(saved)))
}

/// DELETE /sectors/{sector}/records/{id}
pub async fn delete_record(
    service: web::Data<Arc<ManagementService>>,
    cache: web::Data<Arc<DashboardCache>>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    let (sector, id) = path.into_inner();
    let sector = parse_sector(&sector)?;

    service.delete_record(sector, id).await?;
    cache.invalidate().await;

    Ok(HttpResponse::NoContent().finish())
}

/// Remove a whole month of one sector
/// DELETE /sectors/{sector}/months?year=&month=
pub async fn delete_month(
    service: web::Data<Arc<ManagementService>>,
    cache: web::Data<Arc<DashboardCache>>,
    path: web::Path<String>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let sector = parse_sector(&path)?;
    let (year, month) = query
        .year
        .zip(query.month)
        .ok_or_else(|| AppError::validation("year and month are required"))?;

    let removed = service.delete_month(sector, PeriodKey::new(year, month)).await?;
    cache.invalidate().await;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": removed })))
}

/// Overwrite the income and every expense category of a food month
/// PUT /sectors/food/months
pub async fn replace_food_month(
    service: web::Data<Arc<ManagementService>>,
    cache: web::Data<Arc<DashboardCache>>,
    request: web::Json<ReplaceFoodMonthRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let period = PeriodKey::new(request.year, request.month);

    let saved = service
        .replace_food_month(period, request.income, &request.expenses)
        .await?;
    cache.invalidate().await;

    let response: Vec<SectorRecordResponse> = saved.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// Store a month of sports rows in one go
/// POST /sectors/sports/import
pub async fn import_sports_month(
    service: web::Data<Arc<ManagementService>>,
    cache: web::Data<Arc<DashboardCache>>,
    request: web::Json<SportImportRequest>,
) -> Result<HttpResponse, AppError> {
    let records = request.into_inner().into_records()?;

    let saved = service.import_sports_month(records).await?;
    cache.invalidate().await;

    let response: Vec<SectorRecordResponse> = saved.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Created().json(response))
}

/// Configure sector routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sectors")
            // fixed paths before the {sector} patterns
            .route("/food/months", web::put().to(replace_food_month))
            .route("/sports/import", web::post().to(import_sports_month))
            .route("/{sector}/stats", web::get().to(get_stats))
            .route("/{sector}/evolution", web::get().to(get_evolution))
            .route("/{sector}/records", web::get().to(list_records))
            .route("/{sector}/records", web::put().to(upsert_record))
            .route("/{sector}/records/{id}", web::delete().to(delete_record))
            .route("/{sector}/months", web::delete().to(delete_month)),
    );
}
