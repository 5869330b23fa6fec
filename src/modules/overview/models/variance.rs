use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Change of one metric between two adjacent periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceResult {
    pub current: Decimal,
    pub previous: Decimal,
    pub allow_negative: bool,
    /// Percentage, e.g. 50 for +50%
    pub change_percent: Decimal,
}

impl VarianceResult {
    pub fn is_increase(&self) -> bool {
        self.change_percent > Decimal::ZERO
    }

    pub fn is_decrease(&self) -> bool {
        self.change_percent < Decimal::ZERO
    }
}
