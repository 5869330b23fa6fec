use std::str::FromStr;
use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::overview::controllers::DashboardCache;
use crate::modules::sectors::models::DirectoryKind;
use crate::modules::sectors::services::ManagementService;

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub name: String,
}

fn parse_kind(raw: &str) -> Result<DirectoryKind, AppError> {
    DirectoryKind::from_str(raw).map_err(AppError::NotFound)
}

/// GET /directory/{kind}
pub async fn list_entries(
    service: web::Data<Arc<ManagementService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let kind = parse_kind(&path)?;
    let entries = service.list_directory(kind).await?;

    Ok(HttpResponse::Ok().json(entries))
}

/// Register a tenant or an event
/// POST /directory/{kind}
pub async fn create_entry(
    service: web::Data<Arc<ManagementService>>,
    path: web::Path<String>,
    request: web::Json<CreateEntryRequest>,
) -> Result<HttpResponse, AppError> {
    let kind = parse_kind(&path)?;
    let entry = service.create_directory_entry(kind, &request.name).await?;

    Ok(HttpResponse::Created().json(entry))
}

/// Remove a tenant or an event together with its monthly income
/// DELETE /directory/{kind}/{id}
pub async fn delete_entry(
    service: web::Data<Arc<ManagementService>>,
    cache: web::Data<Arc<DashboardCache>>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (kind, id) = path.into_inner();
    let kind = parse_kind(&kind)?;

    service.delete_directory_entry(kind, &id).await?;
    cache.invalidate().await;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure directory routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/directory")
            .route("/{kind}", web::get().to(list_entries))
            .route("/{kind}", web::post().to(create_entry))
            .route("/{kind}/{id}", web::delete().to(delete_entry)),
    );
}
