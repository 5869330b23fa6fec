// Management writes and their effect on the read side

#[path = "../helpers/mod.rs"]
mod helpers;

use std::collections::BTreeMap;
use std::sync::Arc;

use meca_reporting::core::{AppError, PeriodKey};
use meca_reporting::modules::overview::services::OverviewService;
use meca_reporting::modules::sectors::models::{
    DirectoryKind, ExpenseCategory, Sector, SectorRecord, SportDiscipline,
};
use meca_reporting::modules::sectors::repositories::{InMemorySectorRepository, SectorRepository};
use meca_reporting::modules::sectors::services::ManagementService;
use rust_decimal_macros::dec;

fn setup() -> (Arc<dyn SectorRepository>, ManagementService, OverviewService) {
    let repo: Arc<dyn SectorRepository> = Arc::new(InMemorySectorRepository::new());
    (
        repo.clone(),
        ManagementService::new(repo.clone()),
        OverviewService::new(repo),
    )
}

#[tokio::test]
async fn test_upsert_on_natural_key_overwrites() {
    let (_, management, overview) = setup();
    let june = PeriodKey::new(2025, 6);

    management
        .upsert_record(Sector::Clothing, SectorRecord::clothing(june, dec!(100)))
        .await
        .unwrap();
    management
        .upsert_record(Sector::Clothing, SectorRecord::clothing(june, dec!(250)))
        .await
        .unwrap();

    assert_eq!(management.list_records(Sector::Clothing).await.unwrap().len(), 1);
    assert_eq!(overview.get_overview(june).await.sectors.clothing, dec!(250));
}

#[tokio::test]
async fn test_replace_food_month_then_delete_month() {
    let (_, management, overview) = setup();
    let june = PeriodKey::new(2025, 6);
    let mut expenses = BTreeMap::new();
    expenses.insert(ExpenseCategory::MateriaPrima, dec!(2500));
    expenses.insert(ExpenseCategory::Impuestos, dec!(1500));

    management
        .replace_food_month(june, dec!(10000), &expenses)
        .await
        .unwrap();
    assert_eq!(overview.get_overview(june).await.sectors.food, dec!(6000));

    // overwriting drops categories that are no longer sent
    management
        .replace_food_month(june, dec!(10000), &BTreeMap::new())
        .await
        .unwrap();
    assert_eq!(overview.get_overview(june).await.sectors.food, dec!(10000));

    let removed = management.delete_month(Sector::Food, june).await.unwrap();
    assert_eq!(removed, 5);
    assert_eq!(overview.get_overview(june).await.sectors.food, dec!(0));
}

#[tokio::test]
async fn test_import_replaces_sports_month() {
    let (_, management, overview) = setup();
    let june = PeriodKey::new(2025, 6);

    management
        .import_sports_month(vec![
            SectorRecord::sport(june, SportDiscipline::PadelIndoor, 10, dec!(1000)),
            SectorRecord::sport(june, SportDiscipline::PadelOutdoor, 5, dec!(500)),
            SectorRecord::sport(june, SportDiscipline::Futbol, 8, dec!(1600)),
        ])
        .await
        .unwrap();

    assert_eq!(overview.get_overview(june).await.sectors.sports, dec!(3100));
}

#[tokio::test]
async fn test_invalid_import_writes_nothing() {
    let (_, management, _) = setup();
    let june = PeriodKey::new(2025, 6);

    let result = management
        .import_sports_month(vec![
            SectorRecord::sport(june, SportDiscipline::PadelIndoor, 10, dec!(1000)),
            SectorRecord::sport(june, SportDiscipline::Futbol, 8, dec!(-1)),
        ])
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(management.list_records(Sector::Sports).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_tenant_removes_its_income() {
    let (_, management, overview) = setup();
    let june = PeriodKey::new(2025, 6);
    let tenant = management
        .create_directory_entry(DirectoryKind::Tenants, "Kiosco")
        .await
        .unwrap();

    management
        .upsert_record(Sector::Tenants, SectorRecord::tenant(june, tenant.id.clone(), dec!(900)))
        .await
        .unwrap();
    assert_eq!(overview.get_overview(june).await.sectors.tenants, dec!(900));

    management
        .delete_directory_entry(DirectoryKind::Tenants, &tenant.id)
        .await
        .unwrap();

    assert_eq!(overview.get_overview(june).await.sectors.tenants, dec!(0));
    assert!(management.list_directory(DirectoryKind::Tenants).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_tenant_is_rejected() {
    let (_, management, _) = setup();
    let result = management
        .upsert_record(
            Sector::Tenants,
            SectorRecord::tenant(PeriodKey::new(2025, 6), "missing", dec!(10)),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_delete_unknown_record_is_not_found() {
    let (_, management, _) = setup();
    let result = management.delete_record(Sector::Events, 42).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
