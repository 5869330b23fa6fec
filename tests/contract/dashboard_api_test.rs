// HTTP contract of the dashboard, report and management endpoints

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use actix_web::{test, App};
use helpers::*;
use serde_json::{json, Value};

use meca_reporting::middleware::CookieAuth;
use meca_reporting::modules::sectors::repositories::InMemorySectorRepository;

#[actix_web::test]
async fn test_overview_amounts_are_decimal_strings() {
    let repo = Arc::new(InMemorySectorRepository::new());
    seed_june_2025(&repo).await;
    let services = services(repo);
    let cookie = session_cookie(&services);
    let app = test::init_service(
        App::new()
            .wrap(CookieAuth::new(services.sessions.clone()))
            .configure(|cfg| services.configure(cfg)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/overview?year=2025&month=6")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["label"], "jun");
    assert_eq!(body["total"]["current"], "11000.00");
    assert_eq!(body["degraded"], false);

    let food = body["sectors"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["sector"] == "food")
        .unwrap();
    assert_eq!(food["amount"], "6000.00");
    assert_eq!(food["change_percent"], "100.00");
}

#[actix_web::test]
async fn test_requests_without_session_get_401() {
    let services = services(Arc::new(InMemorySectorRepository::new()));
    let app = test::init_service(
        App::new()
            .wrap(CookieAuth::new(services.sessions.clone()))
            .configure(|cfg| services.configure(cfg)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/overview").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], 401);

    // health endpoints stay public
    let req = test::TestRequest::get().uri("/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
    let req = test::TestRequest::get().uri("/ready").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
}

#[actix_web::test]
async fn test_evolution_range() {
    let services = services(Arc::new(InMemorySectorRepository::new()));
    let cookie = session_cookie(&services);
    let app = test::init_service(
        App::new()
            .wrap(CookieAuth::new(services.sessions.clone()))
            .configure(|cfg| services.configure(cfg)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/overview/evolution?range=3")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["points"].as_array().unwrap().len(), 3);
    assert_eq!(body["points"][2]["total"], "0.00");

    let req = test::TestRequest::get()
        .uri("/api/overview/evolution")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["points"].as_array().unwrap().len(), 12);

    for range in ["0", "121", "18446744073709551615"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/overview/evolution?range={}", range))
            .cookie(cookie.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400, "range={}", range);
    }

    let req = test::TestRequest::get()
        .uri("/api/overview/evolution?range=120")
        .cookie(cookie)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["points"].as_array().unwrap().len(), 120);
}

#[actix_web::test]
async fn test_yearly_and_sector_evolution() {
    let repo = Arc::new(InMemorySectorRepository::new());
    seed_june_2025(&repo).await;
    let services = services(repo);
    let cookie = session_cookie(&services);
    let app = test::init_service(
        App::new()
            .wrap(CookieAuth::new(services.sessions.clone()))
            .configure(|cfg| services.configure(cfg)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/overview/evolution/yearly?year=2025")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let points = body["points"].as_array().unwrap();
    assert_eq!(points.len(), 12);
    assert_eq!(points[0]["label"], "ene");
    assert_eq!(points[5]["total"], "11000.00");
    assert_eq!(points[6]["total"], "0.00");

    let req = test::TestRequest::get()
        .uri("/api/sectors/sports/evolution?year=2025")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let june = &body["points"][5];
    assert_eq!(june["total"], "5000.00");
    assert_eq!(june["lines"][0]["key"], "padel_indoor");
    assert_eq!(june["lines"][0]["courts_rented"], 20);
    assert_eq!(june["lines"][2]["income"], "2000.00");
    assert_eq!(body["points"][4]["lines"].as_array().unwrap().len(), 3);

    let req = test::TestRequest::get()
        .uri("/api/sectors/food/evolution?range=500")
        .cookie(cookie)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}

#[actix_web::test]
async fn test_variance_endpoint() {
    let services = services(Arc::new(InMemorySectorRepository::new()));
    let cookie = session_cookie(&services);
    let app = test::init_service(
        App::new()
            .wrap(CookieAuth::new(services.sessions.clone()))
            .configure(|cfg| services.configure(cfg)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/variance?current=-50&previous=-100&allow_negative=true")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["change_percent"], "50.00");

    let req = test::TestRequest::get()
        .uri("/api/variance?current=79228162514264337593543950335&previous=0.01")
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::get()
        .uri("/api/variance?current=abc&previous=1")
        .cookie(cookie)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}

#[actix_web::test]
async fn test_management_write_invalidates_cached_overview() {
    let repo = Arc::new(InMemorySectorRepository::new());
    let services = services(repo);
    let cookie = session_cookie(&services);
    let app = test::init_service(
        App::new()
            .wrap(CookieAuth::new(services.sessions.clone()))
            .configure(|cfg| services.configure(cfg)),
    )
    .await;

    let overview = || {
        test::TestRequest::get()
            .uri("/api/overview?year=2025&month=6")
            .cookie(cookie.clone())
            .to_request()
    };

    let body: Value = test::call_and_read_body_json(&app, overview()).await;
    assert_eq!(body["total"]["current"], "0.00");

    let req = test::TestRequest::put()
        .uri("/api/sectors/clothing/records")
        .cookie(cookie.clone())
        .set_json(json!({ "year": 2025, "month": 6, "income": "450.50" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let saved: Value = test::read_body_json(resp).await;
    assert_eq!(saved["income"], "450.50");

    let body: Value = test::call_and_read_body_json(&app, overview()).await;
    assert_eq!(body["total"]["current"], "450.50");
}

#[actix_web::test]
async fn test_invalid_write_is_400() {
    let services = services(Arc::new(InMemorySectorRepository::new()));
    let cookie = session_cookie(&services);
    let app = test::init_service(
        App::new()
            .wrap(CookieAuth::new(services.sessions.clone()))
            .configure(|cfg| services.configure(cfg)),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/api/sectors/clothing/records")
        .cookie(cookie.clone())
        .set_json(json!({ "year": 2025, "month": 13, "income": "10" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::put()
        .uri("/api/sectors/clothing/records")
        .cookie(cookie.clone())
        .set_json(json!({ "year": 2025, "month": 6, "income": "-10" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::get()
        .uri("/api/sectors/casino/stats")
        .cookie(cookie)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_monthly_report_lists_every_sector() {
    let repo = Arc::new(InMemorySectorRepository::new());
    seed_june_2025(&repo).await;
    let services = services(repo);
    let cookie = session_cookie(&services);
    let app = test::init_service(
        App::new()
            .wrap(CookieAuth::new(services.sessions.clone()))
            .configure(|cfg| services.configure(cfg)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/reports/monthly?year=2025&month=6")
        .cookie(cookie)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    for sector in ["sports", "food", "clothing", "tenants", "events"] {
        assert!(body["sectors"][sector].is_array(), "missing {}", sector);
    }
    assert_eq!(body["sectors"]["food"].as_array().unwrap().len(), 3);
    assert_eq!(body["sectors"]["events"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_directory_and_sector_stats() {
    let services = services(Arc::new(InMemorySectorRepository::new()));
    let cookie = session_cookie(&services);
    let app = test::init_service(
        App::new()
            .wrap(CookieAuth::new(services.sessions.clone()))
            .configure(|cfg| services.configure(cfg)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/directory/events")
        .cookie(cookie.clone())
        .set_json(json!({ "name": "Torneo de Verano" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let event: Value = test::read_body_json(resp).await;
    let event_id = event["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri("/api/sectors/events/records")
        .cookie(cookie.clone())
        .set_json(json!({ "year": 2025, "month": 6, "income": "8000", "event_id": &event_id }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get()
        .uri("/api/sectors/events/stats?year=2025&month=6")
        .cookie(cookie.clone())
        .to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["total"], "8000.00");
    assert_eq!(stats["breakdown"][0]["label"], "Torneo de Verano");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/directory/events/{}", event_id))
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);

    let req = test::TestRequest::get()
        .uri("/api/sectors/events/records")
        .cookie(cookie)
        .to_request();
    let rows: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rows.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_food_month_and_sports_import() {
    let services = services(Arc::new(InMemorySectorRepository::new()));
    let cookie = session_cookie(&services);
    let app = test::init_service(
        App::new()
            .wrap(CookieAuth::new(services.sessions.clone()))
            .configure(|cfg| services.configure(cfg)),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/api/sectors/food/months")
        .cookie(cookie.clone())
        .set_json(json!({
            "year": 2025,
            "month": 6,
            "income": "10000",
            "expenses": { "materia_prima": "2500", "sueldos": "1500" }
        }))
        .to_request();
    let rows: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rows.as_array().unwrap().len(), 5);

    let req = test::TestRequest::post()
        .uri("/api/sectors/sports/import")
        .cookie(cookie.clone())
        .set_json(json!({
            "year": 2025,
            "month": 6,
            "rows": [
                { "sport": "Padel Indoor", "courts_rented": 20, "income": "3000" },
                { "sport": "futbol", "courts_rented": 10, "income": "2000" }
            ]
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::get()
        .uri("/api/overview?year=2025&month=6")
        .cookie(cookie)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"]["current"], "11000.00");
}
