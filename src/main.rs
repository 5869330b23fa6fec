use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use meca_reporting::config::{database, Config, StorageBackend};
use meca_reporting::middleware::{CookieAuth, ErrorHandler, RequestId};
use meca_reporting::modules::auth::SessionManager;
use meca_reporting::modules::sectors::repositories::{
    InMemorySectorRepository, MySqlSectorRepository, SectorRepository,
};
use meca_reporting::AppServices;

fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "meca_reporting=debug,actix_web=info".into());

    let registry = tracing_subscriber::registry().with(filter);
    if log_format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config.app.log_format);
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Starting La Meca reporting service");
    tracing::info!(environment = %config.app.env, storage = ?config.app.storage, "Configuration loaded");

    let repo: Arc<dyn SectorRepository> = match (config.app.storage, &config.database) {
        (StorageBackend::MySql, Some(db)) => {
            let pool = db
                .create_pool()
                .await
                .context("Failed to create database pool")?;
            tracing::info!(
                "Database pool initialized ({} connections)",
                db.pool_size
            );
            database::run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;
            Arc::new(MySqlSectorRepository::new(pool))
        }
        (StorageBackend::MySql, None) => anyhow::bail!("MySQL storage selected without database settings"),
        (StorageBackend::Memory, _) => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(InMemorySectorRepository::new())
        }
    };

    let sessions = SessionManager::new(
        config.auth.username.clone(),
        config.auth.password.clone(),
        config.auth.secret.as_bytes(),
        config.auth.session_ttl_hours,
        config.app.is_production(),
    );
    let services = AppServices::new(
        repo,
        config.app.reporting()?,
        sessions,
        config.auth.login_rate_limit_per_minute,
    );

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let cors_origin = config.server.cors_allowed_origin.clone();
    let server = HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
                .supports_credentials()
                .max_age(3600),
            None => Cors::default(),
        };

        App::new()
            .wrap(CookieAuth::new(services.sessions.clone()))
            .wrap(ErrorHandler)
            .wrap(cors)
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .configure(|cfg| services.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
