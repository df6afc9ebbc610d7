//! Unit tests for the indicator registry

use chrono::{TimeZone, Utc};
use confluence::config::AnalyzerConfig;
use confluence::indicators::registry::{IndicatorCategory, IndicatorKind, IndicatorParams, IndicatorRegistry, PriceSeries};
use confluence::indicators::IndicatorError;
use confluence::models::candle::{Candle, CandleWindow, DuplicatePolicy};
use confluence::models::indicators::IndicatorValue;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn create_test_window(count: usize) -> CandleWindow {
    let candles = (0..count)
        .map(|i| {
            let price = dec!(100) + Decimal::from(i);
            Candle::new(
                price,
                price + dec!(0.5),
                price - dec!(0.5),
                price,
                dec!(1000),
                Utc.timestamp_opt(1_700_000_000 + 60 * i as i64, 0).unwrap(),
            )
        })
        .collect();
    CandleWindow::from_history(200, DuplicatePolicy::Overwrite, candles)
}

#[test]
fn test_kind_names_round_trip() {
    for kind in IndicatorKind::ALL {
        assert_eq!(kind.as_str().parse::<IndicatorKind>(), Ok(kind));
    }
    assert_eq!(
        "supertrend".parse::<IndicatorKind>(),
        Err(IndicatorError::UnknownIndicator("supertrend".to_string()))
    );
}

#[test]
fn test_categories() {
    assert_eq!(IndicatorKind::Rsi.category(), IndicatorCategory::Momentum);
    assert_eq!(IndicatorKind::Psar.category(), IndicatorCategory::Trend);
    assert_eq!(IndicatorKind::BollingerBands.category(), IndicatorCategory::Volatility);
    assert_eq!(IndicatorKind::Cmf.category(), IndicatorCategory::Volume);
}

#[test]
fn test_default_min_bars_required() {
    let registry = IndicatorRegistry::from_config(&AnalyzerConfig::default());
    assert_eq!(registry.entries().len(), IndicatorKind::ALL.len());
    // MACD 26 + 9 is the longest default lookback
    assert_eq!(registry.max_lookback(), 35);
    assert_eq!(registry.min_bars_required(30, 10), 45);
}

#[test]
fn test_disabled_indicators_are_not_registered() {
    let mut config = AnalyzerConfig::default();
    config.indicators.set(IndicatorKind::Macd, false);
    config.indicators.set(IndicatorKind::Divergence, false);
    config.indicators.set(IndicatorKind::AwesomeOscillator, false);
    let registry = IndicatorRegistry::from_config(&config);
    assert!(!registry.kinds().any(|k| k == IndicatorKind::Macd));
    assert_eq!(registry.max_lookback(), 28);
}

#[test]
fn test_short_window_marks_unavailable() {
    let registry = IndicatorRegistry::from_config(&AnalyzerConfig::default());
    let values = registry.compute_all(&PriceSeries::from_window(&create_test_window(5)));

    assert_eq!(values.len(), IndicatorKind::ALL.len());
    let unavailable = values.unavailable();
    assert!(unavailable.contains(&IndicatorKind::EmaAlignment));
    assert!(unavailable.contains(&IndicatorKind::BollingerBands));
    assert!(unavailable.contains(&IndicatorKind::Divergence));
    assert!(values.get(IndicatorKind::Obv).is_some());
    assert!(values.contains(IndicatorKind::EmaAlignment));
}

#[test]
fn test_invalid_parameter_is_isolated() {
    let params = IndicatorParams::Rsi { window: 0 };
    assert!(matches!(
        params.validate(),
        Err(IndicatorError::InvalidParameter { indicator: "rsi", name: "window", .. })
    ));

    let mut config = AnalyzerConfig::default();
    config.indicator_periods.rsi = 0;
    let registry = IndicatorRegistry::from_config(&config);
    let values = registry.compute_all(&PriceSeries::from_window(&create_test_window(60)));
    assert_eq!(values.get(IndicatorKind::Rsi), None);
    assert!(values.get(IndicatorKind::Macd).is_some());
}

#[test]
fn test_compute_psar_value() {
    let params = IndicatorParams::from_config(IndicatorKind::Psar, &AnalyzerConfig::default());
    let value = params.compute(&PriceSeries::from_window(&create_test_window(30))).unwrap();
    match value {
        Some(IndicatorValue::Scalar { value }) => assert!(value < dec!(129)),
        other => panic!("expected scalar PSAR, got {other:?}"),
    }
}

#[test]
fn test_empty_prices_compute_nothing() {
    let params = IndicatorParams::from_config(IndicatorKind::Obv, &AnalyzerConfig::default());
    assert_eq!(params.compute(&PriceSeries::default()), Ok(None));
}
