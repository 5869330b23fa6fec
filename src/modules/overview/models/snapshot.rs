use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::PeriodKey;
use crate::modules::sectors::models::Sector;
use crate::modules::sectors::services::DataStatus;

/// Net amount per sector, every sector always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorAmounts {
    pub sports: Decimal,
    pub food: Decimal,
    pub clothing: Decimal,
    pub tenants: Decimal,
    pub events: Decimal,
}

impl SectorAmounts {
    pub fn get(&self, sector: Sector) -> Decimal {
        match sector {
            Sector::Sports => self.sports,
            Sector::Food => self.food,
            Sector::Clothing => self.clothing,
            Sector::Tenants => self.tenants,
            Sector::Events => self.events,
        }
    }

    pub fn add(&mut self, sector: Sector, amount: Decimal) {
        let slot = match sector {
            Sector::Sports => &mut self.sports,
            Sector::Food => &mut self.food,
            Sector::Clothing => &mut self.clothing,
            Sector::Tenants => &mut self.tenants,
            Sector::Events => &mut self.events,
        };
        *slot += amount;
    }

    /// Plain sum over sectors
    pub fn total(&self) -> Decimal {
        Sector::ALL.iter().map(|sector| self.get(*sector)).sum()
    }
}

/// Net figures of every sector for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewSnapshot {
    pub period: PeriodKey,
    pub sectors: SectorAmounts,
    pub total: Decimal,
    pub status: DataStatus,
}

impl OverviewSnapshot {
    pub fn new(period: PeriodKey, sectors: SectorAmounts, status: DataStatus) -> Self {
        Self {
            period,
            total: sectors.total(),
            sectors,
            status,
        }
    }

    /// Zero-filled snapshot, used when nothing could be read
    pub fn empty(period: PeriodKey) -> Self {
        Self::new(period, SectorAmounts::default(), DataStatus::complete())
    }

    pub fn amount(&self, sector: Sector) -> Decimal {
        self.sectors.get(sector)
    }

    pub fn is_degraded(&self) -> bool {
        self.status.degraded
    }
}
