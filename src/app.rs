//! Service graph and route table shared by the binary and the API tests

use std::sync::Arc;

use actix_web::web;

use crate::config::ReportingSettings;
use crate::middleware::{json_error_handler, path_error_handler, query_error_handler, RateLimiter};
use crate::modules::auth::SessionManager;
use crate::modules::overview::controllers::DashboardCache;
use crate::modules::overview::services::{EvolutionService, OverviewService};
use crate::modules::reports::ReportService;
use crate::modules::sectors::repositories::SectorRepository;
use crate::modules::sectors::services::{ManagementService, SectorStatsService};
use crate::modules::{auth, health, overview, reports, sectors};

/// Everything the handlers pull from app data
#[derive(Clone)]
pub struct AppServices {
    pub repo: Arc<dyn SectorRepository>,
    pub overview: Arc<OverviewService>,
    pub evolution: Arc<EvolutionService>,
    pub reports: Arc<ReportService>,
    pub stats: Arc<SectorStatsService>,
    pub management: Arc<ManagementService>,
    pub cache: Arc<DashboardCache>,
    pub sessions: Arc<SessionManager>,
    pub login_limiter: RateLimiter,
    pub settings: ReportingSettings,
}

impl AppServices {
    pub fn new(
        repo: Arc<dyn SectorRepository>,
        settings: ReportingSettings,
        sessions: SessionManager,
        login_rate_limit_per_minute: u32,
    ) -> Self {
        Self {
            overview: Arc::new(OverviewService::new(repo.clone())),
            evolution: Arc::new(EvolutionService::new(repo.clone(), settings.clock)),
            reports: Arc::new(ReportService::new(repo.clone())),
            stats: Arc::new(SectorStatsService::new(repo.clone())),
            management: Arc::new(ManagementService::new(repo.clone())),
            cache: Arc::new(DashboardCache::new()),
            sessions: Arc::new(sessions),
            login_limiter: RateLimiter::new(login_rate_limit_per_minute),
            settings,
            repo,
        }
    }

    /// Register app data, extractor error handlers and every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.repo.clone()))
            .app_data(web::Data::new(self.overview.clone()))
            .app_data(web::Data::new(self.evolution.clone()))
            .app_data(web::Data::new(self.reports.clone()))
            .app_data(web::Data::new(self.stats.clone()))
            .app_data(web::Data::new(self.management.clone()))
            .app_data(web::Data::new(self.cache.clone()))
            .app_data(web::Data::new(self.sessions.clone()))
            .app_data(web::Data::new(self.settings))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler));

        health::controllers::configure(cfg);

        let limiter = self.login_limiter.clone();
        cfg.service(
            web::scope("/api")
                .configure(|api| auth::controllers::configure(api, limiter))
                .configure(overview::controllers::configure)
                .configure(reports::controllers::configure)
                .configure(sectors::controllers::configure),
        );
    }
}
