//! Unit tests for stochastic and oscillator indicators

use confluence::indicators::momentum::{
    calculate_awesome_oscillator, calculate_cci, calculate_momentum, calculate_rate_of_change,
    calculate_stochastic, calculate_williams_r, rate_of_change, CCI_CONSTANT,
};
use confluence::series::NumericSeries;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn series(values: &[Decimal]) -> NumericSeries {
    NumericSeries::from_values(values.iter().copied())
}

#[test]
fn test_stochastic_position_in_range() {
    let high = series(&[dec!(10), dec!(12), dec!(11)]);
    let low = series(&[dec!(8), dec!(9), dec!(9)]);
    let close = series(&[dec!(9), dec!(11), dec!(10)]);
    let stoch = calculate_stochastic(&high, &low, &close, 3, 1);
    // incomplete window reads 0
    assert_eq!(stoch.k.get(0), Some(Decimal::ZERO));
    assert_eq!(stoch.k.last(), Some(dec!(50)));
    assert_eq!(stoch.d.last(), Some(dec!(50)));
}

#[test]
fn test_stochastic_zero_range_reads_zero() {
    let flat = series(&[dec!(5); 6]);
    let stoch = calculate_stochastic(&flat, &flat, &flat, 3, 3);
    assert_eq!(stoch.k.last(), Some(Decimal::ZERO));
}

#[test]
fn test_williams_r() {
    let high = series(&[dec!(10), dec!(12), dec!(11)]);
    let low = series(&[dec!(8), dec!(9), dec!(9)]);
    let close = series(&[dec!(9), dec!(11), dec!(10)]);
    let wr = calculate_williams_r(&high, &low, &close, 3);
    assert_eq!(wr.get(0), Some(Decimal::ZERO));
    assert_eq!(wr.last(), Some(dec!(-50)));
}

#[test]
fn test_cci_zero_deviation_reads_zero() {
    let flat = series(&[dec!(42); 25]);
    let cci = calculate_cci(&flat, &flat, &flat, 20, CCI_CONSTANT);
    assert!(cci.iter().all(|v| v == Some(Decimal::ZERO)));
}

#[test]
fn test_momentum_and_rate_of_change() {
    let close = series(&[dec!(100), dec!(105), dec!(110)]);
    let momentum = calculate_momentum(&close, 2);
    assert_eq!(momentum.to_vec(), vec![Some(Decimal::ZERO), Some(Decimal::ZERO), Some(dec!(10))]);

    let roc = calculate_rate_of_change(&close, 2);
    assert_eq!(roc.last(), Some(dec!(10)));
    assert_eq!(roc.first(), Some(Decimal::ZERO));
}

#[test]
fn test_rate_of_change_zero_base() {
    assert_eq!(rate_of_change(dec!(10), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(rate_of_change(dec!(90), dec!(100)), dec!(-10));
}

#[test]
fn test_awesome_oscillator_sign_follows_trend() {
    let rising: Vec<Decimal> = (0..40).map(|i| dec!(50) + Decimal::from(i)).collect();
    let falling: Vec<Decimal> = rising.iter().rev().copied().collect();
    assert!(calculate_awesome_oscillator(&series(&rising), 5, 34).last().unwrap() > Decimal::ZERO);
    assert!(calculate_awesome_oscillator(&series(&falling), 5, 34).last().unwrap() < Decimal::ZERO);
}
