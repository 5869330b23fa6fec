pub mod controllers;
pub mod models;
pub mod services;

pub use models::MonthReport;
pub use services::ReportService;
