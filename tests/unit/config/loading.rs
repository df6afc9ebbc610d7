//! Unit tests for config loading and merging

use confluence::config::validate::sanitize;
use confluence::config::{config_from_str, load_config, AnalyzerConfig, ConfigError, WeightSet, HIGH_VOLATILITY, LOW_VOLATILITY};
use confluence::indicators::registry::IndicatorKind;
use rust_decimal_macros::dec;

fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("confluence-config-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_empty_document_is_default() {
    assert_eq!(config_from_str("{}").unwrap(), AnalyzerConfig::default());
}

#[test]
fn test_round_trip_preserves_periods_and_weights() {
    let mut config = AnalyzerConfig::default();
    config.indicator_periods.rsi = 21;
    config.ema_long_period = 50;
    config.indicators.set(IndicatorKind::Fve, false);
    config.weight_sets.insert(
        LOW_VOLATILITY.to_string(),
        WeightSet::new().with(IndicatorKind::Rsi, dec!(0.75)),
    );

    let raw = serde_json::to_string(&config).unwrap();
    let loaded = config_from_str(&raw).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.indicator_periods.rsi, 21);
    assert_eq!(
        loaded.weight_set(LOW_VOLATILITY).and_then(|w| w.get(IndicatorKind::Rsi)),
        Some(dec!(0.75))
    );
}

#[test]
fn test_unknown_keys_ignored() {
    let config = config_from_str(r#"{"favourite_colour": "blue", "indicator_periods": {"bogus": 3, "rsi": 21}}"#).unwrap();
    let mut expected = AnalyzerConfig::default();
    expected.indicator_periods.rsi = 21;
    assert_eq!(config, expected);
}

#[test]
fn test_wrong_type_keeps_default() {
    let config = config_from_str(r#"{"max_candles": "lots", "rsi_oversold": 25}"#).unwrap();
    assert_eq!(config.max_candles, 200);
    assert_eq!(config.rsi_oversold, dec!(25));
}

#[test]
fn test_weight_set_override_is_per_regime() {
    let config = config_from_str(r#"{"weight_sets": {"low_volatility": {"rsi": 0.9, "supertrend": 2}}}"#).unwrap();
    let low = config.weight_set(LOW_VOLATILITY).unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low.get(IndicatorKind::Rsi), Some(dec!(0.9)));
    assert_eq!(config.weight_set(HIGH_VOLATILITY), Some(&WeightSet::high_volatility()));
}

#[test]
fn test_indicator_flags_merge() {
    let config = config_from_str(r#"{"indicators": {"rsi": false}}"#).unwrap();
    assert!(!config.is_enabled(IndicatorKind::Rsi));
    assert!(config.is_enabled(IndicatorKind::Macd));
}

#[test]
fn test_malformed_json_is_error() {
    assert!(matches!(config_from_str("{not json"), Err(ConfigError::Parse(_))));
}

#[test]
fn test_sanitize_invalid_interval() {
    let mut config = config_from_str(r#"{"interval": "7"}"#).unwrap();
    let warnings = sanitize(&mut config);
    assert_eq!(config.interval, "15");
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_load_config_from_file() {
    let path = write_temp("load.json", r#"{"interval": "60", "indicator_periods": {"atr": 0}}"#);
    let config = load_config(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.interval, "60");
    // zero periods fall back to the default
    assert_eq!(config.indicator_periods.atr, AnalyzerConfig::default().indicator_periods.atr);
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("confluence-config-does-not-exist.json");
    assert!(matches!(load_config(&path), Err(ConfigError::Io { .. })));
}
