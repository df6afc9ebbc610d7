//! Unit tests for the multi-symbol runtime

use chrono::{TimeZone, Utc};
use confluence::config::AnalyzerConfig;
use confluence::core::AnalysisRuntime;
use confluence::models::candle::{Candle, PushOutcome};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn series(count: usize, base: Decimal, step: Decimal) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let close = base + step * Decimal::from(i);
            Candle::new(
                close,
                close + dec!(1),
                close - dec!(1),
                close,
                dec!(500),
                Utc.timestamp_opt(1_700_000_000 + 900 * i as i64, 0).unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_unknown_market_has_no_cycle() {
    let runtime = AnalysisRuntime::new(AnalyzerConfig::default());
    assert!(runtime.is_empty());
    assert!(runtime.run_cycle("BTCUSDT", "15", None, None).is_none());
}

#[test]
fn test_context_created_on_first_ingest() {
    let mut runtime = AnalysisRuntime::new(AnalyzerConfig::default());
    let candle = series(1, dec!(100), dec!(1)).remove(0);
    assert_eq!(runtime.ingest("ETHUSDT", "5", candle), PushOutcome::Appended);
    assert_eq!(runtime.len(), 1);
    assert_eq!(
        runtime.markets().cloned().collect::<Vec<_>>(),
        vec![("ETHUSDT".to_string(), "5".to_string())]
    );
    assert!(runtime.context("ETHUSDT", "5").is_some());
    assert!(runtime.context("ETHUSDT", "15").is_none());
}

#[test]
fn test_markets_are_isolated() {
    let mut runtime = AnalysisRuntime::new(AnalyzerConfig::default());
    runtime.load_history("BTCUSDT", "15", series(60, dec!(100), dec!(1))).unwrap();
    runtime.load_history("ETHUSDT", "15", series(20, dec!(50), dec!(-1))).unwrap();

    let btc = runtime.run_cycle("BTCUSDT", "15", None, None).unwrap();
    let eth = runtime.run_cycle("ETHUSDT", "15", None, None).unwrap();
    assert_eq!(btc.analysis.bars_available, 60);
    assert_eq!(eth.analysis.bars_available, 20);
    assert_eq!(btc.analysis.signal.entry_price, dec!(159));
    assert_eq!(eth.analysis.signal.entry_price, dec!(31));

    // a new bar for one market leaves the other untouched
    let before = runtime.run_cycle("ETHUSDT", "15", None, None);
    let next = series(61, dec!(100), dec!(1)).remove(60);
    runtime.ingest("BTCUSDT", "15", next);
    assert_eq!(runtime.run_cycle("ETHUSDT", "15", None, None), before);
    assert_eq!(runtime.context("BTCUSDT", "15").map(|c| c.window().len()), Some(61));
}

#[test]
fn test_remove_market() {
    let mut runtime = AnalysisRuntime::new(AnalyzerConfig::default());
    runtime.load_history("BTCUSDT", "15", series(5, dec!(100), dec!(1))).unwrap();
    let removed = runtime.remove("BTCUSDT", "15").unwrap();
    assert_eq!(removed.symbol(), "BTCUSDT");
    assert!(runtime.is_empty());
}
