//! Unit tests for MACD indicator

use confluence::indicators::momentum::{calculate_macd, calculate_macd_default, detect_macd_divergence, DIVERGENCE_MIN_BARS};
use confluence::models::indicators::Bias;
use confluence::series::NumericSeries;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn series(values: impl IntoIterator<Item = Decimal>) -> NumericSeries {
    NumericSeries::from_values(values)
}

#[test]
fn test_macd_flat_series_is_zero() {
    let macd = calculate_macd_default(&series(vec![dec!(100); 40]));
    assert_eq!(macd.macd.last(), Some(Decimal::ZERO));
    assert_eq!(macd.signal.last(), Some(Decimal::ZERO));
    assert_eq!(macd.histogram.last(), Some(Decimal::ZERO));
}

#[test]
fn test_macd_rising_series_has_positive_histogram() {
    let rising = series((0..40).map(|i| dec!(100) + Decimal::from(i)));
    let macd = calculate_macd(&rising, 12, 26, 9);
    assert_eq!(macd.macd.len(), 40);
    assert!(macd.macd.last().unwrap() > Decimal::ZERO);
    assert!(macd.histogram.last().unwrap() > Decimal::ZERO);
}

fn divergence_fixture(price_then: Decimal, price_now: Decimal, hist_then: Decimal, hist_now: Decimal) -> (NumericSeries, NumericSeries) {
    let mut close = vec![dec!(100); DIVERGENCE_MIN_BARS];
    let mut histogram = vec![Decimal::ZERO; DIVERGENCE_MIN_BARS];
    let last = DIVERGENCE_MIN_BARS - 1;
    // lookback 5 compares the latest bar with the bar four positions back
    close[last - 4] = price_then;
    close[last] = price_now;
    histogram[last - 4] = hist_then;
    histogram[last] = hist_now;
    (series(close), series(histogram))
}

#[test]
fn test_bullish_divergence() {
    let (close, hist) = divergence_fixture(dec!(100), dec!(95), dec!(-2), dec!(-1));
    assert_eq!(detect_macd_divergence(&close, &hist, 5), Some(Bias::Bullish));
}

#[test]
fn test_bearish_divergence() {
    let (close, hist) = divergence_fixture(dec!(100), dec!(105), dec!(2), dec!(1));
    assert_eq!(detect_macd_divergence(&close, &hist, 5), Some(Bias::Bearish));
}

#[test]
fn test_confirming_move_is_neutral() {
    let (close, hist) = divergence_fixture(dec!(100), dec!(105), dec!(1), dec!(2));
    assert_eq!(detect_macd_divergence(&close, &hist, 5), Some(Bias::Neutral));
}

#[test]
fn test_divergence_needs_minimum_bars() {
    let close = series(vec![dec!(100); DIVERGENCE_MIN_BARS - 1]);
    let hist = series(vec![Decimal::ZERO; DIVERGENCE_MIN_BARS - 1]);
    assert_eq!(detect_macd_divergence(&close, &hist, 5), None);
}
