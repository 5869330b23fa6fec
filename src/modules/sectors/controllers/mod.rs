pub mod directory_controller;
pub mod sector_controller;

pub use sector_controller::SectorRecordResponse;

/// Configure sector and directory routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    sector_controller::configure(cfg);
    directory_controller::configure(cfg);
}
