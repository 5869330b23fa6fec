pub mod directory;
pub mod record;
pub mod sector;
pub mod stats;

pub use directory::{DirectoryEntry, DirectoryKind};
pub use record::{ExpenseCategory, RecordDetail, SectorRecord, SportDiscipline};
pub use sector::{Sector, SectorDescriptor};
pub use stats::{BreakdownLine, SectorEvolution, SectorEvolutionPoint, SectorStats};
