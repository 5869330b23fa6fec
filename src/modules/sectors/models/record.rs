use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::money::validate_amount;
use crate::core::{AppError, PeriodKey, Result};

use super::sector::Sector;

/// Court disciplines rented by the sports sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportDiscipline {
    PadelIndoor,
    PadelOutdoor,
    Futbol,
}

impl SportDiscipline {
    pub const ALL: [SportDiscipline; 3] = [
        SportDiscipline::PadelIndoor,
        SportDiscipline::PadelOutdoor,
        SportDiscipline::Futbol,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SportDiscipline::PadelIndoor => "padel_indoor",
            SportDiscipline::PadelOutdoor => "padel_outdoor",
            SportDiscipline::Futbol => "futbol",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SportDiscipline::PadelIndoor => "Padel Indoor",
            SportDiscipline::PadelOutdoor => "Padel Outdoor",
            SportDiscipline::Futbol => "Fútbol",
        }
    }
}

impl fmt::Display for SportDiscipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SportDiscipline {
    type Err = String;

    /// Accepts both stored keys ("padel_indoor") and display names ("Padel Indoor")
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "padel_indoor" => Ok(SportDiscipline::PadelIndoor),
            "padel_outdoor" => Ok(SportDiscipline::PadelOutdoor),
            "futbol" | "fútbol" => Ok(SportDiscipline::Futbol),
            other => Err(format!("Unknown sport: {}", other)),
        }
    }
}

/// Food & beverage expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    MateriaPrima,
    Sueldos,
    Impuestos,
    Otros,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 4] = [
        ExpenseCategory::MateriaPrima,
        ExpenseCategory::Sueldos,
        ExpenseCategory::Impuestos,
        ExpenseCategory::Otros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::MateriaPrima => "materia_prima",
            ExpenseCategory::Sueldos => "sueldos",
            ExpenseCategory::Impuestos => "impuestos",
            ExpenseCategory::Otros => "otros",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExpenseCategory::MateriaPrima => "Materia Prima",
            ExpenseCategory::Sueldos => "Sueldos",
            ExpenseCategory::Impuestos => "Impuestos",
            ExpenseCategory::Otros => "Otros",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "materia_prima" => Ok(ExpenseCategory::MateriaPrima),
            "sueldos" => Ok(ExpenseCategory::Sueldos),
            "impuestos" => Ok(ExpenseCategory::Impuestos),
            "otros" => Ok(ExpenseCategory::Otros),
            other => Err(format!("Unknown expense category: {}", other)),
        }
    }
}

/// Sector-specific part of a monthly row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordDetail {
    Sport {
        discipline: SportDiscipline,
        courts_rented: i32,
    },
    FoodIncome,
    FoodExpense {
        category: ExpenseCategory,
    },
    Clothing,
    Tenant {
        tenant_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tenant_name: Option<String>,
    },
    Event {
        event_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        event_name: Option<String>,
    },
}

/// One stored monthly row of any sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub period: PeriodKey,
    #[serde(default)]
    pub income: Decimal,
    #[serde(default)]
    pub expense: Decimal,
    pub detail: RecordDetail,
}

impl SectorRecord {
    fn with_detail(period: PeriodKey, income: Decimal, expense: Decimal, detail: RecordDetail) -> Self {
        Self {
            id: None,
            period,
            income,
            expense,
            detail,
        }
    }

    pub fn sport(
        period: PeriodKey,
        discipline: SportDiscipline,
        courts_rented: i32,
        income: Decimal,
    ) -> Self {
        Self::with_detail(
            period,
            income,
            Decimal::ZERO,
            RecordDetail::Sport {
                discipline,
                courts_rented,
            },
        )
    }

    pub fn food_income(period: PeriodKey, income: Decimal) -> Self {
        Self::with_detail(period, income, Decimal::ZERO, RecordDetail::FoodIncome)
    }

    pub fn food_expense(period: PeriodKey, category: ExpenseCategory, amount: Decimal) -> Self {
        Self::with_detail(
            period,
            Decimal::ZERO,
            amount,
            RecordDetail::FoodExpense { category },
        )
    }

    pub fn clothing(period: PeriodKey, income: Decimal) -> Self {
        Self::with_detail(period, income, Decimal::ZERO, RecordDetail::Clothing)
    }

    pub fn tenant(period: PeriodKey, tenant_id: impl Into<String>, income: Decimal) -> Self {
        Self::with_detail(
            period,
            income,
            Decimal::ZERO,
            RecordDetail::Tenant {
                tenant_id: tenant_id.into(),
                tenant_name: None,
            },
        )
    }

    pub fn event(period: PeriodKey, event_id: impl Into<String>, income: Decimal) -> Self {
        Self::with_detail(
            period,
            income,
            Decimal::ZERO,
            RecordDetail::Event {
                event_id: event_id.into(),
                event_name: None,
            },
        )
    }

    pub fn sector(&self) -> Sector {
        match self.detail {
            RecordDetail::Sport { .. } => Sector::Sports,
            RecordDetail::FoodIncome | RecordDetail::FoodExpense { .. } => Sector::Food,
            RecordDetail::Clothing => Sector::Clothing,
            RecordDetail::Tenant { .. } => Sector::Tenants,
            RecordDetail::Event { .. } => Sector::Events,
        }
    }

    /// Key of the breakdown line this row contributes to
    pub fn line_key(&self) -> String {
        match &self.detail {
            RecordDetail::Sport { discipline, .. } => discipline.to_string(),
            RecordDetail::FoodIncome => "income".to_string(),
            RecordDetail::FoodExpense { category } => category.to_string(),
            RecordDetail::Clothing => "clothing".to_string(),
            RecordDetail::Tenant { tenant_id, .. } => tenant_id.clone(),
            RecordDetail::Event { event_id, .. } => event_id.clone(),
        }
    }

    /// Natural key the store upserts on
    pub fn natural_key(&self) -> String {
        let scope = match &self.detail {
            RecordDetail::Sport { discipline, .. } => format!("sport:{}", discipline),
            RecordDetail::FoodIncome => "food_income".to_string(),
            RecordDetail::FoodExpense { category } => format!("food_expense:{}", category),
            RecordDetail::Clothing => "clothing".to_string(),
            RecordDetail::Tenant { tenant_id, .. } => format!("tenant:{}", tenant_id),
            RecordDetail::Event { event_id, .. } => format!("event:{}", event_id),
        };
        format!("{}:{}", scope, self.period)
    }

    /// Courts rented, zero for non-sport rows
    pub fn courts_rented(&self) -> i32 {
        match self.detail {
            RecordDetail::Sport { courts_rented, .. } => courts_rented,
            _ => 0,
        }
    }

    /// Checks a row before it is written.
    ///
    /// Reads never validate periods; writes do, so nothing unreachable by
    /// a read ever gets stored.
    pub fn validate(&self) -> Result<()> {
        if self.period.year < 2000 {
            return Err(AppError::validation(format!(
                "year must be 2000 or later, got {}",
                self.period.year
            )));
        }

        if !self.period.is_valid_month() {
            return Err(AppError::validation(format!(
                "month must be between 1 and 12, got {}",
                self.period.month
            )));
        }

        validate_amount("income", self.income).map_err(AppError::Validation)?;
        validate_amount("expense", self.expense).map_err(AppError::Validation)?;

        match &self.detail {
            RecordDetail::Sport { courts_rented, .. } if *courts_rented < 0 => {
                Err(AppError::validation("courts_rented cannot be negative"))
            }
            RecordDetail::FoodExpense { .. } if !self.income.is_zero() => Err(
                AppError::validation("food expense rows cannot carry income"),
            ),
            RecordDetail::Tenant { tenant_id, .. } if tenant_id.trim().is_empty() => {
                Err(AppError::validation("tenant_id is required"))
            }
            RecordDetail::Event { event_id, .. } if event_id.trim().is_empty() => {
                Err(AppError::validation("event_id is required"))
            }
            RecordDetail::Sport { .. }
            | RecordDetail::FoodIncome
            | RecordDetail::Clothing
            | RecordDetail::Tenant { .. }
            | RecordDetail::Event { .. }
                if !self.expense.is_zero() =>
            {
                Err(AppError::validation(format!(
                    "{} rows cannot carry expense",
                    self.sector()
                )))
            }
            _ => Ok(()),
        }
    }
}
