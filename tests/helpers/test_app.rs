use std::sync::Arc;

use actix_web::cookie::Cookie;
use chrono::Utc;
use rust_decimal::Decimal;

use meca_reporting::config::ReportingSettings;
use meca_reporting::core::{PeriodKey, ReportClock};
use meca_reporting::modules::auth::services::AUTH_COOKIE;
use meca_reporting::modules::auth::SessionManager;
use meca_reporting::modules::sectors::models::{ExpenseCategory, SectorRecord, SportDiscipline};
use meca_reporting::modules::sectors::repositories::{InMemorySectorRepository, SectorRepository};
use meca_reporting::AppServices;

pub const TEST_USER: &str = "admin";
pub const TEST_PASSWORD: &str = "la-meca-2025";
pub const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

pub fn reporting_settings() -> ReportingSettings {
    ReportingSettings {
        clock: ReportClock::utc(),
        default_range: 12,
    }
}

pub fn services(repo: Arc<dyn SectorRepository>) -> AppServices {
    services_with_limit(repo, 100)
}

pub fn services_with_limit(repo: Arc<dyn SectorRepository>, login_per_minute: u32) -> AppServices {
    let sessions = SessionManager::new(TEST_USER, TEST_PASSWORD, TEST_SECRET, 24, false);
    AppServices::new(repo, reporting_settings(), sessions, login_per_minute)
}

/// A valid session cookie for `services`
pub fn session_cookie(services: &AppServices) -> Cookie<'static> {
    let token = services
        .sessions
        .issue(TEST_USER, Utc::now())
        .expect("token signing");
    Cookie::new(AUTH_COOKIE, token)
}

/// June 2025: food income 10000 with 4000 of expenses, sports 5000
pub async fn seed_june_2025(repo: &InMemorySectorRepository) {
    let june = PeriodKey::new(2025, 6);
    let rows = [
        SectorRecord::food_income(june, Decimal::new(10000, 0)),
        SectorRecord::food_expense(june, ExpenseCategory::MateriaPrima, Decimal::new(2500, 0)),
        SectorRecord::food_expense(june, ExpenseCategory::Sueldos, Decimal::new(1500, 0)),
        SectorRecord::sport(june, SportDiscipline::PadelIndoor, 20, Decimal::new(3000, 0)),
        SectorRecord::sport(june, SportDiscipline::Futbol, 10, Decimal::new(2000, 0)),
    ];

    for row in rows.iter() {
        repo.upsert(row).await.expect("seed row");
    }
}
