// Property tests for the month-over-month variance rule

use meca_reporting::overview::services::{checked_variance, variance};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn non_zero_amount() -> impl Strategy<Value = Decimal> {
    amount().prop_filter("non-zero", |d| !d.is_zero())
}

fn any_decimal() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::MAX),
        Just(Decimal::MIN),
        (any::<i64>(), 0u32..=28).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale)),
    ]
}

#[test]
fn test_reference_values() {
    assert_eq!(variance(dec!(0), dec!(0), false), dec!(0));
    assert_eq!(variance(dec!(100), dec!(0), false), dec!(100));
    assert_eq!(variance(dec!(150), dec!(100), false), dec!(50));
    assert_eq!(variance(dec!(-50), dec!(-100), true), dec!(50));
}

proptest! {
    #[test]
    fn unchanged_amount_is_flat(value in amount(), allow_negative in any::<bool>()) {
        prop_assert_eq!(variance(value, value, allow_negative), Decimal::ZERO);
    }

    #[test]
    fn zero_base_is_capped_at_one_hundred(current in amount(), allow_negative in any::<bool>()) {
        let result = variance(current, Decimal::ZERO, allow_negative);
        prop_assert!(result.abs() <= Decimal::ONE_HUNDRED);
        prop_assert_eq!(result.is_sign_negative() && !result.is_zero(), current < Decimal::ZERO);
    }

    #[test]
    fn signed_base_tracks_direction_of_change(
        current in amount(),
        previous in non_zero_amount(),
    ) {
        let result = variance(current, previous, true);
        if current > previous {
            prop_assert!(result > Decimal::ZERO);
        } else if current < previous {
            prop_assert!(result < Decimal::ZERO);
        } else {
            prop_assert_eq!(result, Decimal::ZERO);
        }
    }

    #[test]
    fn positive_base_ignores_sign_policy(
        current in amount(),
        previous in (1i64..10_000_000i64).prop_map(|c| Decimal::new(c, 2)),
    ) {
        prop_assert_eq!(variance(current, previous, true), variance(current, previous, false));
    }

    #[test]
    fn extreme_amounts_saturate(
        current in any_decimal(),
        previous in any_decimal(),
        allow_negative in any::<bool>(),
    ) {
        let result = variance(current, previous, allow_negative);
        match checked_variance(current, previous, allow_negative) {
            Some(exact) => prop_assert_eq!(result, exact),
            None => prop_assert!(result == Decimal::MAX || result == Decimal::MIN),
        }
    }
}
