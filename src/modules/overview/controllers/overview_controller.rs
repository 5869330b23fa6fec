use std::str::FromStr;
use std::sync::Arc;

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ReportingSettings;
use crate::core::error::AppError;
use crate::core::money::format_amount;
use crate::core::{PeriodQuery, MAX_WINDOW_MONTHS};
use crate::modules::overview::models::{EvolutionPoint, EvolutionSeries, OverviewTrend, VarianceResult};
use crate::modules::overview::services::{EvolutionService, OverviewService, VarianceCalculator};
use crate::modules::sectors::models::Sector;

use super::cache::DashboardCache;

/// Query parameters for the evolution chart
#[derive(Debug, Deserialize)]
pub struct EvolutionQuery {
    pub range: Option<usize>,
}

/// Calendar year selector; defaults to the current year
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

/// Query parameters for an ad-hoc variance
#[derive(Debug, Deserialize)]
pub struct VarianceQuery {
    pub current: String,
    pub previous: String,
    #[serde(default)]
    pub allow_negative: bool,
}

#[derive(Debug, Serialize)]
pub struct VarianceResponse {
    pub current: String,
    pub previous: String,
    pub allow_negative: bool,
    pub change_percent: String,
}

impl From<VarianceResult> for VarianceResponse {
    fn from(result: VarianceResult) -> Self {
        Self {
            current: format_amount(result.current),
            previous: format_amount(result.previous),
            allow_negative: result.allow_negative,
            change_percent: format_amount(result.change_percent),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SectorFigureResponse {
    pub sector: Sector,
    pub amount: String,
    pub previous: String,
    pub change_percent: String,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub sectors: Vec<SectorFigureResponse>,
    pub total: VarianceResponse,
    pub degraded: bool,
    pub failed_sectors: Vec<Sector>,
}

impl From<OverviewTrend> for OverviewResponse {
    fn from(trend: OverviewTrend) -> Self {
        let period = trend.current.period;
        let mut failed_sectors = trend.current.status.failed_sectors.clone();
        failed_sectors.extend(trend.previous.status.failed_sectors.iter().copied());
        failed_sectors.sort();
        failed_sectors.dedup();

        Self {
            year: period.year,
            month: period.month,
            label: period.label(),
            sectors: trend
                .sectors
                .iter()
                .map(|sector| SectorFigureResponse {
                    sector: sector.sector,
                    amount: format_amount(sector.variance.current),
                    previous: format_amount(sector.variance.previous),
                    change_percent: format_amount(sector.variance.change_percent),
                })
                .collect(),
            total: trend.total.into(),
            degraded: trend.is_degraded(),
            failed_sectors,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EvolutionPointResponse {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub sports: String,
    pub food: String,
    pub clothing: String,
    pub tenants: String,
    pub events: String,
    pub total: String,
}

impl From<EvolutionPoint> for EvolutionPointResponse {
    fn from(point: EvolutionPoint) -> Self {
        Self {
            year: point.period.year,
            month: point.period.month,
            label: point.label,
            sports: format_amount(point.sectors.sports),
            food: format_amount(point.sectors.food),
            clothing: format_amount(point.sectors.clothing),
            tenants: format_amount(point.sectors.tenants),
            events: format_amount(point.sectors.events),
            total: format_amount(point.total),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EvolutionResponse {
    pub range: usize,
    pub points: Vec<EvolutionPointResponse>,
    pub degraded: bool,
    pub failed_sectors: Vec<Sector>,
}

impl From<EvolutionSeries> for EvolutionResponse {
    fn from(series: EvolutionSeries) -> Self {
        Self {
            range: series.window,
            points: series.points.into_iter().map(Into::into).collect(),
            degraded: series.status.degraded,
            failed_sectors: series.status.failed_sectors,
        }
    }
}

/// Net amount per sector with month-over-month variance
/// GET /overview?year=&month=
pub async fn get_overview(
    service: web::Data<Arc<OverviewService>>,
    cache: web::Data<Arc<DashboardCache>>,
    settings: web::Data<ReportingSettings>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let period = query.resolve(&settings.clock)?;

    let generation = cache.generation();
    let trend = match cache.overview(period).await {
        Some(trend) => trend,
        None => {
            let trend = service.get_overview_trend(period).await;
            cache.store_overview(generation, &trend).await;
            trend
        }
    };

    Ok(HttpResponse::Ok().json(OverviewResponse::from(trend)))
}

/// Trailing monthly series ending at the current month
/// GET /overview/evolution?range=N
pub async fn get_evolution(
    service: web::Data<Arc<EvolutionService>>,
    cache: web::Data<Arc<DashboardCache>>,
    settings: web::Data<ReportingSettings>,
    query: web::Query<EvolutionQuery>,
) -> Result<HttpResponse, AppError> {
    let window = validate_window(query.range.unwrap_or(settings.default_range))?;

    let anchor = settings.clock.current_period();
    let generation = cache.generation();
    let series = match cache.evolution(anchor, window).await {
        Some(series) => series,
        None => {
            let series = service.build(window, anchor).await;
            cache.store_evolution(generation, anchor, &series).await;
            series
        }
    };

    Ok(HttpResponse::Ok().json(EvolutionResponse::from(series)))
}

/// January to December of one year
/// GET /overview/evolution/yearly?year=
pub async fn get_yearly_evolution(
    service: web::Data<Arc<EvolutionService>>,
    settings: web::Data<ReportingSettings>,
    query: web::Query<YearQuery>,
) -> Result<HttpResponse, AppError> {
    let year = query
        .year
        .unwrap_or_else(|| settings.clock.current_period().year);

    let series = service.build_year(year).await;

    Ok(HttpResponse::Ok().json(EvolutionResponse::from(series)))
}

/// Rejects windows outside `1..=MAX_WINDOW_MONTHS`
pub(crate) fn validate_window(window: usize) -> Result<usize, AppError> {
    if (1..=MAX_WINDOW_MONTHS).contains(&window) {
        Ok(window)
    } else {
        Err(AppError::validation(format!(
            "range must be between 1 and {}, got {}",
            MAX_WINDOW_MONTHS, window
        )))
    }
}

/// Drop memoized dashboard data
/// POST /overview/refresh
pub async fn refresh(cache: web::Data<Arc<DashboardCache>>) -> Result<HttpResponse, AppError> {
    cache.invalidate().await;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "refreshed" })))
}

/// Percentage change between two arbitrary amounts
/// GET /variance?current=&previous=&allow_negative=
pub async fn get_variance(query: web::Query<VarianceQuery>) -> Result<HttpResponse, AppError> {
    let current = parse_decimal("current", &query.current)?;
    let previous = parse_decimal("previous", &query.previous)?;

    let result = VarianceCalculator::try_compare(current, previous, query.allow_negative)
        .ok_or_else(|| AppError::validation("variance is too large to represent"))?;

    Ok(HttpResponse::Ok().json(VarianceResponse::from(result)))
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, AppError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| AppError::validation(format!("{} is not a valid amount: {}", field, raw)))
}

/// Configure overview routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/overview")
            .route("", web::get().to(get_overview))
            .route("/evolution", web::get().to(get_evolution))
            .route("/evolution/yearly", web::get().to(get_yearly_evolution))
            .route("/refresh", web::post().to(refresh)),
    )
    .route("/variance", web::get().to(get_variance));
}
