use std::collections::BTreeMap;
use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::config::ReportingSettings;
use crate::core::error::AppError;
use crate::core::PeriodQuery;
use crate::modules::reports::models::MonthReport;
use crate::modules::reports::services::ReportService;
use crate::modules::sectors::controllers::SectorRecordResponse;
use crate::modules::sectors::models::Sector;

/// Response structure for the full monthly report
#[derive(Debug, Serialize)]
pub struct MonthReportResponse {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub sectors: BTreeMap<Sector, Vec<SectorRecordResponse>>,
    pub degraded: bool,
    pub failed_sectors: Vec<Sector>,
}

impl From<MonthReport> for MonthReportResponse {
    fn from(report: MonthReport) -> Self {
        Self {
            year: report.period.year,
            month: report.period.month,
            label: report.period.label(),
            sectors: report
                .sectors
                .into_iter()
                .map(|(sector, rows)| (sector, rows.into_iter().map(Into::into).collect()))
                .collect(),
            degraded: report.status.degraded,
            failed_sectors: report.status.failed_sectors,
        }
    }
}

/// Raw rows of every sector for one month
/// GET /reports/monthly?year=&month=
pub async fn get_monthly_report(
    service: web::Data<Arc<ReportService>>,
    settings: web::Data<ReportingSettings>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let period = query.resolve(&settings.clock)?;
    let report = service.get_full_report(period).await;

    Ok(HttpResponse::Ok().json(MonthReportResponse::from(report)))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/reports").route("/monthly", web::get().to(get_monthly_report)));
}
