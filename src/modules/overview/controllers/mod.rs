pub mod cache;
pub mod overview_controller;

pub use cache::DashboardCache;
pub use overview_controller::configure;
