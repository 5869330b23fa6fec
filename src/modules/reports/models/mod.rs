pub mod month_report;

pub use month_report::MonthReport;
