use rust_decimal::Decimal;

use crate::modules::overview::models::VarianceResult;

/// Reported change when the previous period was zero and the current one is not
pub const ZERO_BASE_SENTINEL: Decimal = Decimal::ONE_HUNDRED;

/// Percentage change from `previous` to `current`.
///
/// - previous != 0: `(current - previous) / previous * 100`, dividing by
///   `|previous|` when `allow_negative` so that climbing from -100 to -50
///   reads as +50%.
/// - previous == 0: 0 when current is 0, otherwise +/-100.
///
/// A change too large for `Decimal` saturates at `Decimal::MAX` or
/// `Decimal::MIN`; use [`checked_variance`] to detect it.
pub fn variance(current: Decimal, previous: Decimal, allow_negative: bool) -> Decimal {
    checked_variance(current, previous, allow_negative).unwrap_or_else(|| {
        let rising = (current > previous) == (base(previous, allow_negative) > Decimal::ZERO);
        if rising {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

/// Same rule as [`variance`], `None` when the result does not fit a `Decimal`
pub fn checked_variance(current: Decimal, previous: Decimal, allow_negative: bool) -> Option<Decimal> {
    if previous.is_zero() {
        return Some(if current.is_zero() {
            Decimal::ZERO
        } else if current > Decimal::ZERO {
            ZERO_BASE_SENTINEL
        } else {
            -ZERO_BASE_SENTINEL
        });
    }

    current
        .checked_sub(previous)?
        .checked_div(base(previous, allow_negative))?
        .checked_mul(Decimal::ONE_HUNDRED)
}

fn base(previous: Decimal, allow_negative: bool) -> Decimal {
    if allow_negative {
        previous.abs()
    } else {
        previous
    }
}

/// Variance calculator bundling inputs with the result
pub struct VarianceCalculator;

impl VarianceCalculator {
    pub fn compare(current: Decimal, previous: Decimal, allow_negative: bool) -> VarianceResult {
        VarianceResult {
            current,
            previous,
            allow_negative,
            change_percent: variance(current, previous, allow_negative),
        }
    }

    /// Like [`compare`](Self::compare) but refuses results that overflow
    pub fn try_compare(current: Decimal, previous: Decimal, allow_negative: bool) -> Option<VarianceResult> {
        checked_variance(current, previous, allow_negative).map(|change_percent| VarianceResult {
            current,
            previous,
            allow_negative,
            change_percent,
        })
    }
}
