//! Unit tests for the incremental indicator engine

use chrono::{TimeZone, Utc};
use confluence::config::AnalyzerConfig;
use confluence::indicators::momentum::calculate_wilder_rsi;
use confluence::indicators::trend::{calculate_ema, calculate_psar, calculate_wilder_adx};
use confluence::indicators::volatility::calculate_wilder_atr;
use confluence::models::candle::Candle;
use confluence::series::NumericSeries;
use confluence::state::{IncrementalIndicatorState, IncrementalParams};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn candle(i: usize, close: Decimal, range: Decimal, volume: Decimal) -> Candle {
    Candle::new(
        close,
        close + range,
        close - range,
        close,
        volume,
        Utc.timestamp_opt(1_700_000_000 + 900 * i as i64, 0).unwrap(),
    )
}

fn zigzag_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let swing = Decimal::from((i * 7) % 11) - dec!(5);
            candle(i, dec!(100) + Decimal::from(i) / dec!(4) + swing, dec!(0.8), dec!(1000) + Decimal::from(i % 4) * dec!(150))
        })
        .collect()
}

fn column(candles: &[Candle], f: impl Fn(&Candle) -> Decimal) -> NumericSeries {
    NumericSeries::from_values(candles.iter().map(f))
}

#[test]
fn test_advance_matches_full_history() {
    let candles = zigzag_candles(80);
    let params = IncrementalParams::default();

    let mut stepped = IncrementalIndicatorState::initialize_from_history(params.clone(), &candles[..40]).unwrap();
    for c in &candles[40..] {
        stepped.advance(c);
    }
    let full = IncrementalIndicatorState::initialize_from_history(params, &candles).unwrap();

    assert_eq!(stepped.bars(), 80);
    assert_eq!(stepped, full);
    assert_eq!(stepped.snapshot(), full.snapshot());
}

#[test]
fn test_snapshot_matches_library_functions() {
    let candles = zigzag_candles(60);
    let params = IncrementalParams::default();
    let mut state = IncrementalIndicatorState::initialize_from_history(params.clone(), &candles[..1]).unwrap();
    for c in &candles[1..] {
        state.advance(c);
    }
    let snapshot = state.snapshot();

    let high = column(&candles, |c| c.high);
    let low = column(&candles, |c| c.low);
    let close = column(&candles, |c| c.close);

    assert_eq!(Some(snapshot.atr), calculate_wilder_atr(&high, &low, &close, params.atr_period).last());
    assert_eq!(Some(snapshot.rsi), calculate_wilder_rsi(&close, params.rsi_period).last());
    assert_eq!(Some(snapshot.adx), calculate_wilder_adx(&high, &low, &close, params.adx_period).adx.last());
    assert_eq!(Some(snapshot.ema_short), calculate_ema(&close, params.ema_short).last());
    assert_eq!(Some(snapshot.ema_long), calculate_ema(&close, params.ema_long).last());
    assert_eq!(
        Some(snapshot.psar),
        calculate_psar(&high, &low, &close, params.psar_acceleration, params.psar_max_acceleration).last()
    );
}

#[test]
fn test_uptrend_trend_filter() {
    let candles: Vec<Candle> = (0..40)
        .map(|i| candle(i, dec!(100) + Decimal::from(i), dec!(0.5), dec!(1000)))
        .collect();
    let state = IncrementalIndicatorState::initialize_from_history(IncrementalParams::default(), &candles).unwrap();
    let snapshot = state.snapshot();

    assert!(snapshot.trend_up);
    assert!(snapshot.prev_trend_up);
    assert!(snapshot.psar_uptrend);
    assert!(snapshot.roc > Decimal::ZERO);
    assert!(!snapshot.volume_spike);
    assert!(snapshot.plus_di > snapshot.minus_di);
    let chandelier = snapshot.chandelier_long.unwrap();
    assert!(chandelier < snapshot.close);
}

#[test]
fn test_volume_spike_on_latest_bar() {
    let mut candles: Vec<Candle> = (0..25).map(|i| candle(i, dec!(100), dec!(1), dec!(100))).collect();
    candles.push(candle(25, dec!(100), dec!(1), dec!(1000)));
    let state = IncrementalIndicatorState::initialize_from_history(IncrementalParams::default(), &candles).unwrap();
    assert!(state.snapshot().volume_spike);
}

#[test]
fn test_params_follow_config() {
    let mut config = AnalyzerConfig::default();
    config.indicator_periods.atr = 7;
    config.ema_short_period = 5;
    let params = IncrementalParams::from_config(&config);
    assert_eq!(params.atr_period, 7);
    assert_eq!(params.ema_short, 5);
    assert_eq!(params.ema_long, 26);
}

proptest! {
    #[test]
    fn test_warm_up_then_advance_equals_full_warm_up(
        closes in prop::collection::vec(100i64..100_000, 2..70),
        ranges in prop::collection::vec(0i64..500, 70),
        volumes in prop::collection::vec(1i64..10_000, 70),
        split in 1usize..69,
    ) {
        let candles: Vec<Candle> = closes
            .iter()
            .enumerate()
            .map(|(i, c)| candle(i, Decimal::new(*c, 2), Decimal::new(ranges[i], 2), Decimal::from(volumes[i])))
            .collect();
        let split = split.min(candles.len() - 1);
        let params = IncrementalParams::default();

        let mut stepped = IncrementalIndicatorState::initialize_from_history(params.clone(), &candles[..split]).unwrap();
        for c in &candles[split..] {
            stepped.advance(c);
        }
        let full = IncrementalIndicatorState::initialize_from_history(params, &candles).unwrap();
        prop_assert_eq!(stepped, full);
    }
}
