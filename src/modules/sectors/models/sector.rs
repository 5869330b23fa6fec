use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::record::SectorRecord;

/// Revenue lines of the complex, in reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    Sports,
    Food,
    Clothing,
    Tenants,
    Events,
}

impl Sector {
    pub const ALL: [Sector; 5] = [
        Sector::Sports,
        Sector::Food,
        Sector::Clothing,
        Sector::Tenants,
        Sector::Events,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Sports => "sports",
            Sector::Food => "food",
            Sector::Clothing => "clothing",
            Sector::Tenants => "tenants",
            Sector::Events => "events",
        }
    }

    pub fn descriptor(&self) -> SectorDescriptor {
        SectorDescriptor::for_sector(*self)
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sports" => Ok(Sector::Sports),
            "food" => Ok(Sector::Food),
            "clothing" => Ok(Sector::Clothing),
            "tenants" => Ok(Sector::Tenants),
            "events" => Ok(Sector::Events),
            other => Err(format!("Unknown sector: {}", other)),
        }
    }
}

/// How a sector's rows turn into a net amount.
///
/// Every sector goes through the same summation; only these flags differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorDescriptor {
    pub sector: Sector,
    /// Expense rows are subtracted from income
    pub counts_expense: bool,
    /// Totals can go below zero, so variance divides by |previous|
    pub allow_negative: bool,
    /// Upper bound of rows one month can hold, used to cap batched reads.
    /// For tenants and events this is only a floor; the directory size wins.
    pub max_rows_per_month: u32,
}

impl SectorDescriptor {
    pub fn for_sector(sector: Sector) -> Self {
        match sector {
            // one row per discipline
            Sector::Sports => Self {
                sector,
                counts_expense: false,
                allow_negative: false,
                max_rows_per_month: 3,
            },
            // one income row plus one row per expense category
            Sector::Food => Self {
                sector,
                counts_expense: true,
                allow_negative: true,
                max_rows_per_month: 5,
            },
            Sector::Clothing => Self {
                sector,
                counts_expense: false,
                allow_negative: false,
                max_rows_per_month: 1,
            },
            Sector::Tenants | Sector::Events => Self {
                sector,
                counts_expense: false,
                allow_negative: false,
                max_rows_per_month: 32,
            },
        }
    }

    /// Net contribution of one row
    pub fn net_amount(&self, record: &SectorRecord) -> Decimal {
        if self.counts_expense {
            record.income - record.expense
        } else {
            record.income
        }
    }

    /// Net total of a set of rows
    pub fn sum_net<'a, I>(&self, records: I) -> Decimal
    where
        I: IntoIterator<Item = &'a SectorRecord>,
    {
        records
            .into_iter()
            .map(|record| self.net_amount(record))
            .sum()
    }

    /// Row cap for a batched read covering `months` months
    pub fn range_limit(&self, months: usize) -> u32 {
        let months = u32::try_from(months).unwrap_or(u32::MAX);
        months.saturating_mul(self.max_rows_per_month)
    }
}
