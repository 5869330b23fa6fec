use crate::core::{AppError, ReportClock, Result, MAX_WINDOW_MONTHS};
use std::env;
use std::fmt;
use std::str::FromStr;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Minimum length of the token signing secret, in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    /// Present only for the MySQL backend
    pub database: Option<DatabaseConfig>,
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MySql,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::MySql),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("Unknown storage backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// "json" switches log output to JSON lines
    pub log_format: String,
    pub default_evolution_range: usize,
    pub report_utc_offset_hours: i32,
    pub storage: StorageBackend,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    pub fn reporting(&self) -> Result<ReportingSettings> {
        Ok(ReportingSettings {
            clock: ReportClock::from_offset_hours(self.report_utc_offset_hours)?,
            default_range: self.default_evolution_range,
        })
    }
}

/// Settings the dashboard endpoints read on every request
#[derive(Debug, Clone, Copy)]
pub struct ReportingSettings {
    pub clock: ReportClock,
    pub default_range: usize,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    pub secret: String,
    pub session_ttl_hours: u32,
    pub login_rate_limit_per_minute: u32,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("secret", &"<redacted>")
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("login_rate_limit_per_minute", &self.login_rate_limit_per_minute)
            .finish()
    }
}

/// Parse an optional variable, falling back to `default` when unset
pub(crate) fn parse_var<T: FromStr>(name: &str, default: &str) -> Result<T> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {}", name)))
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).map_err(|_| AppError::Configuration(format!("{} not set", name)))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let storage = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "mysql".to_string())
            .parse::<StorageBackend>()
            .map_err(AppError::Configuration)?;

        let app = AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            default_evolution_range: parse_var("DEFAULT_EVOLUTION_RANGE", "12")?,
            report_utc_offset_hours: parse_var("REPORT_UTC_OFFSET_HOURS", "-3")?,
            storage,
        };

        let database = match storage {
            StorageBackend::MySql => Some(DatabaseConfig::from_env()?),
            StorageBackend::Memory => None,
        };

        let config = Config {
            app,
            database,
            server: ServerConfig::from_env()?,
            auth: AuthConfig {
                username: required_var("AUTHORIZATION_USER")?,
                password: required_var("AUTHORIZATION_PASSWORD")?,
                secret: required_var("AUTH_SECRET")?,
                session_ttl_hours: parse_var("SESSION_TTL_HOURS", "24")?,
                login_rate_limit_per_minute: parse_var("LOGIN_RATE_LIMIT_PER_MINUTE", "10")?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_WINDOW_MONTHS).contains(&self.app.default_evolution_range) {
            return Err(AppError::Configuration(format!(
                "Default evolution range must be between 1 and {}, got {}",
                MAX_WINDOW_MONTHS, self.app.default_evolution_range
            )));
        }

        if !(-14..=14).contains(&self.app.report_utc_offset_hours) {
            return Err(AppError::Configuration(format!(
                "UTC offset must be within +/-14 hours, got {}",
                self.app.report_utc_offset_hours
            )));
        }

        if self.auth.secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Configuration(format!(
                "AUTH_SECRET must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        if self.auth.username.is_empty() || self.auth.password.is_empty() {
            return Err(AppError::Configuration(
                "Login credentials must not be empty".to_string(),
            ));
        }

        if self.auth.session_ttl_hours == 0 {
            return Err(AppError::Configuration(
                "Session TTL must be greater than 0".to_string(),
            ));
        }

        if self.auth.login_rate_limit_per_minute == 0 {
            return Err(AppError::Configuration(
                "Rate limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
