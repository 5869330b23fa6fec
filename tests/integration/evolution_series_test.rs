// Trailing monthly series for the evolution chart

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use helpers::*;
use meca_reporting::core::{PeriodKey, ReportClock};
use meca_reporting::core::MAX_WINDOW_MONTHS;
use meca_reporting::modules::overview::services::{EvolutionService, OverviewService};
use meca_reporting::modules::sectors::models::{DirectoryKind, Sector, SectorRecord, SportDiscipline};
use meca_reporting::modules::sectors::repositories::{InMemorySectorRepository, SectorRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn service(repo: Arc<dyn SectorRepository>) -> EvolutionService {
    EvolutionService::new(repo, ReportClock::utc())
}

#[tokio::test]
async fn test_three_month_window_with_one_populated_month() {
    let repo = Arc::new(InMemorySectorRepository::new());
    repo.upsert(&SectorRecord::clothing(PeriodKey::new(2025, 5), dec!(2000)))
        .await
        .unwrap();

    let series = service(repo).build(3, PeriodKey::new(2025, 6)).await;

    assert_eq!(
        series.periods(),
        vec![
            PeriodKey::new(2025, 4),
            PeriodKey::new(2025, 5),
            PeriodKey::new(2025, 6),
        ]
    );
    let totals: Vec<Decimal> = series.points.iter().map(|p| p.total).collect();
    assert_eq!(totals, vec![dec!(0), dec!(2000), dec!(0)]);
    assert_eq!(series.points[1].label, "may");
}

#[tokio::test]
async fn test_window_crosses_year_boundary() {
    let repo = Arc::new(InMemorySectorRepository::new());
    repo.upsert(&SectorRecord::sport(
        PeriodKey::new(2024, 12),
        SportDiscipline::Futbol,
        4,
        dec!(800),
    ))
    .await
    .unwrap();

    let series = service(repo).build(4, PeriodKey::new(2025, 2)).await;

    assert_eq!(series.periods()[0], PeriodKey::new(2024, 11));
    assert_eq!(series.periods()[3], PeriodKey::new(2025, 2));
    assert_eq!(series.points[1].sectors.sports, dec!(800));
    assert_eq!(series.points[1].label, "dic");
}

#[tokio::test]
async fn test_length_is_exact_for_many_windows() {
    let repo: Arc<dyn SectorRepository> = Arc::new(InMemorySectorRepository::new());
    let service = service(repo);

    for window in [1usize, 2, 6, 12, 24, 37] {
        let series = service.build(window, PeriodKey::new(2025, 6)).await;
        assert_eq!(series.len(), window);
        assert!(series.periods().windows(2).all(|pair| pair[0] < pair[1]));
    }
}

#[tokio::test]
async fn test_zero_window_is_clamped_to_one() {
    let series = service(Arc::new(InMemorySectorRepository::new()))
        .build(0, PeriodKey::new(2025, 6))
        .await;

    assert_eq!(series.len(), 1);
    assert_eq!(series.periods(), vec![PeriodKey::new(2025, 6)]);
}

#[tokio::test]
async fn test_rows_outside_window_are_ignored() {
    let repo = Arc::new(InMemorySectorRepository::new());
    for month in 1..=12 {
        repo.upsert(&SectorRecord::clothing(PeriodKey::new(2024, month), dec!(1)))
            .await
            .unwrap();
    }
    repo.upsert(&SectorRecord::clothing(PeriodKey::new(2025, 7), dec!(99)))
        .await
        .unwrap();

    let series = service(repo).build(3, PeriodKey::new(2025, 6)).await;
    let total: Decimal = series.points.iter().map(|p| p.total).sum();

    assert_eq!(total, Decimal::ZERO);
}

#[tokio::test]
async fn test_failed_sector_is_zero_in_every_month() {
    let inner = Arc::new(InMemorySectorRepository::new());
    inner
        .upsert(&SectorRecord::clothing(PeriodKey::new(2025, 6), dec!(50)))
        .await
        .unwrap();
    inner
        .upsert(&SectorRecord::food_income(PeriodKey::new(2025, 6), dec!(75)))
        .await
        .unwrap();
    let repo = Arc::new(FlakyRepository::new(inner, &[Sector::Clothing]));

    let series = service(repo).build(2, PeriodKey::new(2025, 6)).await;

    assert!(series.is_degraded());
    assert_eq!(series.status.failed_sectors, vec![Sector::Clothing]);
    assert!(series.points.iter().all(|p| p.sectors.clothing.is_zero()));
    assert_eq!(series.points[1].sectors.food, dec!(75));
}

#[tokio::test]
async fn test_one_batched_read_per_sector() {
    let inner = Arc::new(InMemorySectorRepository::new());
    let repo = Arc::new(FlakyRepository::new(inner, &[]));

    service(repo.clone()).build(12, PeriodKey::new(2025, 6)).await;

    assert_eq!(repo.reads(), Sector::ALL.len());
}

#[tokio::test]
async fn test_more_tenants_than_default_row_cap_are_all_counted() {
    let repo = Arc::new(InMemorySectorRepository::new());
    let june = PeriodKey::new(2025, 6);
    for n in 0..40 {
        let tenant = repo
            .create_directory_entry(DirectoryKind::Tenants, &format!("Local {}", n))
            .await
            .unwrap();
        repo.upsert(&SectorRecord::tenant(june, tenant.id, dec!(100)))
            .await
            .unwrap();
    }

    let overview = OverviewService::new(repo.clone()).get_overview(june).await;
    let series = service(repo).build(1, june).await;

    assert_eq!(overview.sectors.tenants, dec!(4000));
    assert_eq!(series.points[0].sectors.tenants, dec!(4000));
    assert!(!series.is_degraded());
}

#[tokio::test]
async fn test_window_is_clamped_to_maximum() {
    let series = service(Arc::new(InMemorySectorRepository::new()))
        .build(usize::MAX, PeriodKey::new(2025, 6))
        .await;

    assert_eq!(series.len(), MAX_WINDOW_MONTHS);
    assert_eq!(series.periods()[MAX_WINDOW_MONTHS - 1], PeriodKey::new(2025, 6));
}

#[tokio::test]
async fn test_calendar_year_series() {
    let repo = Arc::new(InMemorySectorRepository::new());
    seed_june_2025(&repo).await;
    repo.upsert(&SectorRecord::clothing(PeriodKey::new(2024, 12), dec!(999)))
        .await
        .unwrap();
    repo.upsert(&SectorRecord::clothing(PeriodKey::new(2025, 12), dec!(300)))
        .await
        .unwrap();

    let series = service(repo).build_year(2025).await;

    assert_eq!(series.len(), 12);
    assert_eq!(series.periods()[0], PeriodKey::new(2025, 1));
    assert_eq!(series.points[5].sectors.food, dec!(6000));
    assert_eq!(series.points[5].total, dec!(11000));
    assert_eq!(series.points[11].sectors.clothing, dec!(300));
    assert_eq!(series.points[0].total, Decimal::ZERO);
    assert_eq!(series.points[8].label, "sept");
}
