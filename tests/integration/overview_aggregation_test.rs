// Monthly aggregation across every sector

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use helpers::*;
use meca_reporting::core::PeriodKey;
use meca_reporting::modules::overview::services::OverviewService;
use meca_reporting::modules::sectors::models::{Sector, SectorRecord};
use meca_reporting::modules::sectors::repositories::{InMemorySectorRepository, SectorRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_empty_store_gives_all_zero() {
    let service = OverviewService::new(Arc::new(InMemorySectorRepository::new()));
    let snapshot = service.get_overview(PeriodKey::new(2025, 6)).await;

    for sector in Sector::ALL {
        assert_eq!(snapshot.amount(sector), Decimal::ZERO);
    }
    assert_eq!(snapshot.total, Decimal::ZERO);
    assert!(!snapshot.is_degraded());
}

#[tokio::test]
async fn test_food_is_net_of_expenses() {
    let repo = Arc::new(InMemorySectorRepository::new());
    seed_june_2025(&repo).await;

    let snapshot = OverviewService::new(repo)
        .get_overview(PeriodKey::new(2025, 6))
        .await;

    assert_eq!(snapshot.sectors.sports, dec!(5000));
    assert_eq!(snapshot.sectors.food, dec!(6000));
    assert_eq!(snapshot.sectors.clothing, dec!(0));
    assert_eq!(snapshot.sectors.tenants, dec!(0));
    assert_eq!(snapshot.sectors.events, dec!(0));
    assert_eq!(snapshot.total, dec!(11000));
}

#[tokio::test]
async fn test_other_months_do_not_leak() {
    let repo = Arc::new(InMemorySectorRepository::new());
    seed_june_2025(&repo).await;
    repo.upsert(&SectorRecord::clothing(PeriodKey::new(2025, 5), dec!(700)))
        .await
        .unwrap();

    let snapshot = OverviewService::new(repo)
        .get_overview(PeriodKey::new(2025, 6))
        .await;

    assert_eq!(snapshot.sectors.clothing, dec!(0));
}

#[tokio::test]
async fn test_repeated_calls_are_identical() {
    let repo = Arc::new(InMemorySectorRepository::new());
    seed_june_2025(&repo).await;
    let service = OverviewService::new(repo);

    let first = service.get_overview(PeriodKey::new(2025, 6)).await;
    let second = service.get_overview(PeriodKey::new(2025, 6)).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_clothing_failure_degrades_only_clothing() {
    let inner = Arc::new(InMemorySectorRepository::new());
    seed_june_2025(&inner).await;
    inner
        .upsert(&SectorRecord::clothing(PeriodKey::new(2025, 6), dec!(900)))
        .await
        .unwrap();
    let repo = Arc::new(FlakyRepository::new(inner, &[Sector::Clothing]));

    let snapshot = OverviewService::new(repo.clone())
        .get_overview(PeriodKey::new(2025, 6))
        .await;

    assert_eq!(snapshot.sectors.sports, dec!(5000));
    assert_eq!(snapshot.sectors.food, dec!(6000));
    assert_eq!(snapshot.sectors.clothing, dec!(0));
    assert_eq!(snapshot.total, dec!(11000));
    assert!(snapshot.status.degraded);
    assert_eq!(snapshot.status.failed_sectors, vec![Sector::Clothing]);
    // every sector was still read
    assert_eq!(repo.reads(), Sector::ALL.len());
}

#[tokio::test]
async fn test_trend_uses_signed_base_for_food() {
    let repo = Arc::new(InMemorySectorRepository::new());
    let may = PeriodKey::new(2025, 5);
    let june = PeriodKey::new(2025, 6);
    repo.upsert(&SectorRecord::food_expense(
        may,
        meca_reporting::modules::sectors::models::ExpenseCategory::Otros,
        dec!(100),
    ))
    .await
    .unwrap();
    repo.upsert(&SectorRecord::food_expense(
        june,
        meca_reporting::modules::sectors::models::ExpenseCategory::Otros,
        dec!(50),
    ))
    .await
    .unwrap();

    let trend = OverviewService::new(repo).get_overview_trend(june).await;
    let food = trend.sector(Sector::Food).unwrap();

    assert_eq!(food.variance.current, dec!(-50));
    assert_eq!(food.variance.previous, dec!(-100));
    assert_eq!(food.variance.change_percent, dec!(50));
}
