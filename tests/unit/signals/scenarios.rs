//! Unit tests for end-to-end scoring scenarios

use chrono::{TimeZone, Utc};
use confluence::config::{AnalyzerConfig, WeightSet, HIGH_VOLATILITY, LOW_VOLATILITY};
use confluence::indicators::registry::IndicatorKind;
use confluence::models::analysis::VolatilityRegime;
use confluence::models::candle::{Candle, CandleWindow, DuplicatePolicy};
use confluence::models::indicators::{Bias, IndicatorValue};
use confluence::models::order_book::{BookLevel, OrderBookSnapshot};
use confluence::models::signal::SignalAction;
use confluence::signals::{SignalEngine, BULLISH_WALL_CONDITION};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn window(candles: Vec<Candle>) -> CandleWindow {
    CandleWindow::from_history(200, DuplicatePolicy::Overwrite, candles)
}

fn rising_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let close = dec!(100) + Decimal::from(i);
            Candle::new(
                close,
                close + dec!(0.5),
                close - dec!(0.5),
                close,
                dec!(1000),
                Utc.timestamp_opt(1_700_000_000 + 900 * i as i64, 0).unwrap(),
            )
        })
        .collect()
}

fn flat_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            Candle::new(
                dec!(100),
                dec!(100),
                dec!(100),
                dec!(100),
                dec!(1000),
                Utc.timestamp_opt(1_700_000_000 + 900 * i as i64, 0).unwrap(),
            )
        })
        .collect()
}

/// Only EMA alignment, RSI, MACD and PSAR are enabled, with the same
/// weights in both regimes.
fn trend_config() -> AnalyzerConfig {
    let mut config = AnalyzerConfig::default();
    for kind in IndicatorKind::ALL {
        config.indicators.set(kind, false);
    }
    let enabled = [
        (IndicatorKind::EmaAlignment, dec!(1.0)),
        (IndicatorKind::Rsi, dec!(0.5)),
        (IndicatorKind::Macd, dec!(0.5)),
        (IndicatorKind::Psar, dec!(0.5)),
    ];
    let mut weights = WeightSet::new();
    for (kind, weight) in enabled {
        config.indicators.set(kind, true);
        weights = weights.with(kind, weight);
    }
    config.weight_sets.insert(LOW_VOLATILITY.to_string(), weights.clone());
    config.weight_sets.insert(HIGH_VOLATILITY.to_string(), weights);
    config
}

fn wall_book() -> OrderBookSnapshot {
    OrderBookSnapshot::new(
        vec![
            BookLevel::new(dec!(99.9), dec!(1)),
            BookLevel::new(dec!(99.8), dec!(1)),
            BookLevel::new(dec!(99.5), dec!(20)),
        ],
        vec![
            BookLevel::new(dec!(100.1), dec!(1)),
            BookLevel::new(dec!(100.2), dec!(1)),
            BookLevel::new(dec!(100.3), dec!(1)),
        ],
    )
}

#[test]
fn test_uptrend_scores_buy() {
    let engine = SignalEngine::new(trend_config());
    let price = dec!(129);
    let analysis = engine.analyze(&window(rising_candles(30)), None, price);
    let signal = &analysis.signal;

    assert_eq!(signal.action, SignalAction::Buy);
    // a strictly rising series has no losses, so RSI sits at the neutral 50
    assert_eq!(analysis.indicators.get(IndicatorKind::Rsi), Some(&IndicatorValue::scalar(dec!(50))));
    assert_eq!(signal.raw_score, dec!(2.0));
    assert_eq!(
        signal.conditions,
        vec!["EMA Alignment (Bullish)", "MACD Bullish", "PSAR Bullish"]
    );
    assert!((signal.confidence - 2.0 / 5.5).abs() < 1e-9);

    assert_eq!(analysis.regime, VolatilityRegime::HighVolatility);
    assert!(analysis.atr > dec!(1.4) && analysis.atr <= dec!(1.5));
    assert_eq!(signal.entry_price, price);
    assert_eq!(signal.take_profit, Some(price + analysis.atr * dec!(1.0)));
    assert_eq!(signal.stop_loss, Some(price - analysis.atr * dec!(1.5)));
}

#[test]
fn test_uptrend_reasons_carry_signed_weights() {
    let engine = SignalEngine::new(trend_config());
    let analysis = engine.analyze(&window(rising_candles(30)), None, dec!(129));
    let reasons: Vec<(&str, Decimal)> = analysis
        .signal
        .reasons
        .iter()
        .map(|r| (r.source.as_str(), r.weight))
        .collect();
    assert_eq!(reasons, vec![("ema_alignment", dec!(1.0)), ("macd", dec!(0.5)), ("psar", dec!(0.5))]);
}

#[test]
fn test_uptrend_below_min_bars_is_flagged() {
    let engine = SignalEngine::new(trend_config());
    let analysis = engine.analyze(&window(rising_candles(30)), None, dec!(129));
    assert_eq!(analysis.bars_available, 30);
    assert!(!analysis.data_sufficient);
    assert!(analysis.min_bars_required > 30);
}

#[test]
fn test_flat_market_holds() {
    let engine = SignalEngine::new(AnalyzerConfig::default());
    let analysis = engine.analyze(&window(flat_candles(50)), None, dec!(100));
    let signal = &analysis.signal;

    assert!(analysis.data_sufficient);
    assert_eq!(signal.action, SignalAction::Hold);
    assert_eq!(signal.raw_score, Decimal::ZERO);
    assert_eq!(signal.confidence, 0.0);
    assert!(signal.conditions.is_empty());
    assert_eq!(signal.stop_loss, None);
    assert_eq!(signal.take_profit, None);

    assert_eq!(analysis.atr, Decimal::ZERO);
    assert_eq!(analysis.regime, VolatilityRegime::LowVolatility);
    let rsi = analysis.indicators.get(IndicatorKind::Rsi).unwrap();
    assert_eq!(rsi, &IndicatorValue::scalar(dec!(50)));
    assert_eq!(rsi.interpret(IndicatorKind::Rsi, dec!(100)).bias, Bias::Neutral);
    match analysis.indicators.get(IndicatorKind::Macd) {
        Some(IndicatorValue::Macd { histogram, .. }) => assert_eq!(*histogram, Decimal::ZERO),
        other => panic!("expected MACD value, got {other:?}"),
    }
    match analysis.indicators.get(IndicatorKind::BollingerBands) {
        Some(IndicatorValue::Bands { upper, lower, .. }) => {
            assert_eq!(*upper, dec!(100));
            assert_eq!(*lower, dec!(100));
        }
        other => panic!("expected band value, got {other:?}"),
    }
}

#[test]
fn test_bullish_wall_adds_support_boost() {
    let engine = SignalEngine::new(AnalyzerConfig::default());
    let candles = window(flat_candles(50));
    let book = wall_book();

    let without = engine.analyze(&candles, None, dec!(100));
    let with = engine.analyze(&candles, Some(&book), dec!(100));

    assert!(with.walls.has_bullish_wall);
    assert!(!with.walls.has_bearish_wall);
    assert_eq!(with.walls.bullish_walls.get("Bid@99.5000"), Some(&dec!(20)));
    assert_eq!(with.signal.raw_score - without.signal.raw_score, dec!(3));
    assert!(with.signal.conditions.iter().any(|c| c == BULLISH_WALL_CONDITION));
    assert_eq!(with.signal.action, SignalAction::Buy);
    // no volatility, so no protective levels even on a BUY
    assert_eq!(with.signal.stop_loss, None);
    assert_eq!(with.signal.take_profit, None);
}
