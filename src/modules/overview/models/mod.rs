pub mod evolution;
pub mod snapshot;
pub mod trend;
pub mod variance;

pub use evolution::{EvolutionPoint, EvolutionSeries};
pub use snapshot::{OverviewSnapshot, SectorAmounts};
pub use trend::{OverviewTrend, SectorTrend};
pub use variance::VarianceResult;
