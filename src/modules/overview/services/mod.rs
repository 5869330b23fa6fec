pub mod aggregator;
pub mod evolution;
pub mod variance;

pub use aggregator::OverviewService;
pub use evolution::EvolutionService;
pub use variance::{checked_variance, variance, VarianceCalculator};
