// Property tests for calendar period arithmetic

use meca_reporting::core::PeriodKey;
use proptest::prelude::*;

fn period() -> impl Strategy<Value = PeriodKey> {
    (2000i32..2100, 1u32..=12).prop_map(|(year, month)| PeriodKey::new(year, month))
}

#[test]
fn test_year_boundary_window() {
    let window = PeriodKey::new(2025, 2).trailing(4);
    let labels: Vec<String> = window.iter().map(|p| p.label()).collect();

    assert_eq!(window.first(), Some(&PeriodKey::new(2024, 11)));
    assert_eq!(labels, vec!["nov", "dic", "ene", "feb"]);
}

proptest! {
    #[test]
    fn previous_then_next_is_identity(p in period()) {
        prop_assert_eq!(p.previous().next(), p);
        prop_assert_eq!(p.next().previous(), p);
    }

    #[test]
    fn previous_is_one_month_earlier(p in period()) {
        prop_assert_eq!(p.ordinal() - p.previous().ordinal(), 1);
        prop_assert!(p.previous() < p);
    }

    #[test]
    fn trailing_window_is_dense_and_ascending(p in period(), n in 1usize..60) {
        let window = p.trailing(n);
        prop_assert_eq!(window.len(), n);
        prop_assert_eq!(window.last().copied(), Some(p));
        for pair in window.windows(2) {
            prop_assert_eq!(pair[1].ordinal() - pair[0].ordinal(), 1);
        }
    }

    #[test]
    fn labels_never_empty(p in period()) {
        prop_assert!(!p.label().is_empty());
        prop_assert!(p.is_valid_month());
    }
}
