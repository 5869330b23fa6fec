pub mod fanout;
pub mod management_service;
pub mod stats_service;

pub use fanout::{read_range, read_sectors, DataStatus, SectorReads};
pub use management_service::ManagementService;
pub use stats_service::SectorStatsService;
