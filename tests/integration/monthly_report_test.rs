// Full monthly report of raw rows

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use helpers::*;
use meca_reporting::core::PeriodKey;
use meca_reporting::modules::reports::ReportService;
use meca_reporting::modules::sectors::models::{DirectoryKind, Sector, SectorRecord};
use meca_reporting::modules::sectors::repositories::{InMemorySectorRepository, SectorRepository};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_every_sector_key_present_when_empty() {
    let report = ReportService::new(Arc::new(InMemorySectorRepository::new()))
        .get_full_report(PeriodKey::new(2025, 6))
        .await;

    for sector in Sector::ALL {
        assert!(report.sectors.contains_key(&sector));
        assert!(report.rows(sector).is_empty());
    }
    assert!(!report.status.degraded);
}

#[tokio::test]
async fn test_rows_are_returned_unaggregated() {
    let repo = Arc::new(InMemorySectorRepository::new());
    seed_june_2025(&repo).await;
    let tenant = repo
        .create_directory_entry(DirectoryKind::Tenants, "Kiosco Central")
        .await
        .unwrap();
    repo.upsert(&SectorRecord::tenant(PeriodKey::new(2025, 6), tenant.id.clone(), dec!(1200)))
        .await
        .unwrap();

    let report = ReportService::new(repo)
        .get_full_report(PeriodKey::new(2025, 6))
        .await;

    assert_eq!(report.rows(Sector::Food).len(), 3);
    assert_eq!(report.rows(Sector::Sports).len(), 2);
    assert_eq!(report.rows(Sector::Tenants).len(), 1);
    assert_eq!(report.rows(Sector::Tenants)[0].line_key(), tenant.id);
    assert_eq!(report.row_count(), 6);
}

#[tokio::test]
async fn test_failed_sector_is_listed_and_empty() {
    let inner = Arc::new(InMemorySectorRepository::new());
    seed_june_2025(&inner).await;
    let repo = Arc::new(FlakyRepository::new(inner, &[Sector::Sports]));

    let report = ReportService::new(repo)
        .get_full_report(PeriodKey::new(2025, 6))
        .await;

    assert!(report.rows(Sector::Sports).is_empty());
    assert_eq!(report.rows(Sector::Food).len(), 3);
    assert_eq!(report.status.failed_sectors, vec![Sector::Sports]);
}
