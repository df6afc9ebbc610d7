//! Unit tests for RSI indicator

use confluence::indicators::momentum::{calculate_rsi, calculate_stoch_rsi, calculate_wilder_rsi, rsi_from_averages, RSI_NEUTRAL};
use confluence::series::NumericSeries;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn closes(values: &[i64]) -> NumericSeries {
    NumericSeries::from_values(values.iter().map(|v| Decimal::from(*v)))
}

#[test]
fn test_rsi_flat_series_is_neutral() {
    let rsi = calculate_rsi(&closes(&[100; 30]), 14);
    assert_eq!(rsi.len(), 30);
    assert!(rsi.iter().all(|v| v == Some(RSI_NEUTRAL)));
}

#[test]
fn test_rsi_falling_series_reaches_zero() {
    let falling: Vec<i64> = (0..20).map(|i| 200 - i).collect();
    let rsi = calculate_rsi(&closes(&falling), 14);
    // no loss on the first bar yet
    assert_eq!(rsi.first(), Some(RSI_NEUTRAL));
    assert_eq!(rsi.last(), Some(Decimal::ZERO));
}

#[test]
fn test_rsi_from_averages() {
    assert_eq!(rsi_from_averages(dec!(1), dec!(1)), dec!(50));
    assert_eq!(rsi_from_averages(dec!(3), dec!(1)), dec!(75));
    assert_eq!(rsi_from_averages(dec!(5), Decimal::ZERO), RSI_NEUTRAL);
}

#[test]
fn test_rsi_from_averages_extreme_ratio() {
    let tiny_loss = Decimal::new(1, 28);
    assert_eq!(rsi_from_averages(Decimal::MAX, tiny_loss), Decimal::ONE_HUNDRED);
    assert_eq!(rsi_from_averages(Decimal::MAX, Decimal::ONE), Decimal::ONE_HUNDRED);
}

#[test]
fn test_wilder_rsi_mixed_moves() {
    // deltas: +2, -1 -> Wilder(2): gain 0 -> 1 -> 0.5, loss 0 -> 0 -> 0.5
    let rsi = calculate_wilder_rsi(&closes(&[10, 12, 11]), 2);
    assert_eq!(rsi.get(1), Some(RSI_NEUTRAL));
    assert_eq!(rsi.last(), Some(dec!(50)));
}

#[test]
fn test_stoch_rsi_flat_series_reads_zero() {
    let stoch = calculate_stoch_rsi(&closes(&[50; 40]), 14, 3, 3);
    assert_eq!(stoch.k.last(), Some(Decimal::ZERO));
    assert_eq!(stoch.d.last(), Some(Decimal::ZERO));
}

proptest! {
    #[test]
    fn test_rsi_is_neutral_without_losses(
        start in 1i64..10_000,
        steps in prop::collection::vec(0i64..50, 1..80),
        window in 1usize..30,
    ) {
        let mut price = start;
        let mut values = vec![price];
        for step in steps {
            price += step;
            values.push(price);
        }
        let series = closes(&values);
        for rsi in [calculate_rsi(&series, window), calculate_wilder_rsi(&series, window)] {
            prop_assert!(rsi.iter().all(|v| v == Some(RSI_NEUTRAL)));
        }
    }

    #[test]
    fn test_rsi_stays_in_range(values in prop::collection::vec(1i64..1_000, 2..80)) {
        let rsi = calculate_rsi(&closes(&values), 14);
        for value in rsi.iter().flatten() {
            prop_assert!(value >= Decimal::ZERO && value <= Decimal::ONE_HUNDRED);
        }
    }
}
