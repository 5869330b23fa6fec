pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Sector, SectorRecord};
pub use repositories::SectorRepository;
