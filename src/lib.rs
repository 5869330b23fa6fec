//! La Meca monthly reporting service
//!
//! Aggregates the complex's per-sector monthly figures (sports, food,
//! clothing, tenants, events) into dashboard overviews, evolution series,
//! month-over-month variances and full monthly reports.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use app::AppServices;
pub use modules::overview;
pub use modules::reports;
pub use modules::sectors;
