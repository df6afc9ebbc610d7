use rust_decimal::Decimal;
use tracing::warn;

use super::types::{AnalyzerConfig, IndicatorPeriods, TrendFilterConfig, DEFAULT_INTERVAL, VALID_INTERVALS};

/// Replace semantically invalid values with their defaults.
///
/// Never fails: every problem is fixed in place, logged at `warn` and
/// returned so callers and tests can inspect what changed.
pub fn sanitize(config: &mut AnalyzerConfig) -> Vec<String> {
    let defaults = AnalyzerConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    sanitize_general(config, &defaults, &mut warnings);
    sanitize_periods(config, &mut warnings);
    sanitize_thresholds(config, &defaults, &mut warnings);
    sanitize_trend_filter(&mut config.trend_filter, &mut warnings);
    sanitize_weights(config, &mut warnings);

    for message in &warnings {
        warn!(%message, "config fallback applied");
    }
    warnings
}

// ---------------------------------------------------------------------------
// General
// ---------------------------------------------------------------------------

fn sanitize_general(config: &mut AnalyzerConfig, defaults: &AnalyzerConfig, warnings: &mut Vec<String>) {
    if !VALID_INTERVALS.contains(&config.interval.as_str()) {
        warnings.push(format!(
            "interval: '{}' is not one of {:?}, using '{DEFAULT_INTERVAL}'",
            config.interval, VALID_INTERVALS
        ));
        config.interval = DEFAULT_INTERVAL.to_string();
    }

    nonzero("max_candles", &mut config.max_candles, defaults.max_candles, warnings);
    nonzero(
        "order_book_depth_to_check",
        &mut config.order_book_depth_to_check,
        defaults.order_book_depth_to_check,
        warnings,
    );
    nonzero("num_levels", &mut config.num_levels, defaults.num_levels, warnings);
    if config.analysis_interval == 0 {
        warnings.push(format!("analysis_interval: must be > 0, using {}", defaults.analysis_interval));
        config.analysis_interval = defaults.analysis_interval;
    }
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

fn sanitize_periods(config: &mut AnalyzerConfig, warnings: &mut Vec<String>) {
    let defaults = AnalyzerConfig::default();

    let mut default_periods = IndicatorPeriods::default();
    let fallback: Vec<u32> = default_periods.entries_mut().into_iter().map(|(_, v)| *v).collect();
    for ((name, value), default) in config.indicator_periods.entries_mut().into_iter().zip(fallback) {
        if *value == 0 {
            warnings.push(format!("indicator_periods.{name}: must be > 0, using {default}"));
            *value = default;
        }
    }

    let periods = &mut config.indicator_periods;
    if periods.ao_short >= periods.ao_long {
        warnings.push(format!(
            "indicator_periods: ao_short ({}) must be < ao_long ({}), using defaults",
            periods.ao_short, periods.ao_long
        ));
        periods.ao_short = default_periods.ao_short;
        periods.ao_long = default_periods.ao_long;
    }

    period("ema_short_period", &mut config.ema_short_period, defaults.ema_short_period, warnings);
    period("ema_long_period", &mut config.ema_long_period, defaults.ema_long_period, warnings);
    if config.ema_short_period >= config.ema_long_period {
        warnings.push(format!(
            "ema_short_period ({}) must be < ema_long_period ({}), using defaults",
            config.ema_short_period, config.ema_long_period
        ));
        config.ema_short_period = defaults.ema_short_period;
        config.ema_long_period = defaults.ema_long_period;
    }

    period("macd_fast", &mut config.macd_fast, defaults.macd_fast, warnings);
    period("macd_slow", &mut config.macd_slow, defaults.macd_slow, warnings);
    period("macd_signal", &mut config.macd_signal, defaults.macd_signal, warnings);
    if config.macd_fast >= config.macd_slow {
        warnings.push(format!(
            "macd_fast ({}) must be < macd_slow ({}), using defaults",
            config.macd_fast, config.macd_slow
        ));
        config.macd_fast = defaults.macd_fast;
        config.macd_slow = defaults.macd_slow;
    }

    period("divergence_lookback", &mut config.divergence_lookback, defaults.divergence_lookback, warnings);
}

// ---------------------------------------------------------------------------
// Thresholds and multipliers
// ---------------------------------------------------------------------------

fn sanitize_thresholds(config: &mut AnalyzerConfig, defaults: &AnalyzerConfig, warnings: &mut Vec<String>) {
    positive("signal_score_threshold", &mut config.signal_score_threshold, defaults.signal_score_threshold, warnings);
    positive("stop_loss_multiple", &mut config.stop_loss_multiple, defaults.stop_loss_multiple, warnings);
    positive("take_profit_multiple", &mut config.take_profit_multiple, defaults.take_profit_multiple, warnings);
    positive("atr_change_threshold", &mut config.atr_change_threshold, defaults.atr_change_threshold, warnings);
    positive(
        "volume_confirmation_multiplier",
        &mut config.volume_confirmation_multiplier,
        defaults.volume_confirmation_multiplier,
        warnings,
    );
    positive("bb_std_multiplier", &mut config.bb_std_multiplier, defaults.bb_std_multiplier, warnings);
    positive("cci_constant", &mut config.cci_constant, defaults.cci_constant, warnings);
    positive(
        "order_book_wall_threshold_multiplier",
        &mut config.order_book_wall_threshold_multiplier,
        defaults.order_book_wall_threshold_multiplier,
        warnings,
    );
    non_negative(
        "order_book_support_confidence_boost",
        &mut config.order_book_support_confidence_boost,
        defaults.order_book_support_confidence_boost,
        warnings,
    );
    non_negative(
        "order_book_resistance_confidence_boost",
        &mut config.order_book_resistance_confidence_boost,
        defaults.order_book_resistance_confidence_boost,
        warnings,
    );

    positive("psar_acceleration", &mut config.psar_acceleration, defaults.psar_acceleration, warnings);
    positive("psar_max_acceleration", &mut config.psar_max_acceleration, defaults.psar_max_acceleration, warnings);
    if config.psar_acceleration > config.psar_max_acceleration {
        warnings.push(format!(
            "psar_acceleration ({}) exceeds psar_max_acceleration ({}), using defaults",
            config.psar_acceleration, config.psar_max_acceleration
        ));
        config.psar_acceleration = defaults.psar_acceleration;
        config.psar_max_acceleration = defaults.psar_max_acceleration;
    }

    ordered_band(
        "rsi",
        (&mut config.rsi_oversold, &mut config.rsi_overbought),
        (defaults.rsi_oversold, defaults.rsi_overbought),
        warnings,
    );
    ordered_band(
        "stoch_rsi",
        (&mut config.stoch_rsi_oversold_threshold, &mut config.stoch_rsi_overbought_threshold),
        (defaults.stoch_rsi_oversold_threshold, defaults.stoch_rsi_overbought_threshold),
        warnings,
    );
    ordered_band(
        "stoch_osc",
        (&mut config.stoch_osc_oversold, &mut config.stoch_osc_overbought),
        (defaults.stoch_osc_oversold, defaults.stoch_osc_overbought),
        warnings,
    );
}

fn sanitize_trend_filter(filter: &mut TrendFilterConfig, warnings: &mut Vec<String>) {
    let defaults = TrendFilterConfig::default();
    period("trend_filter.smoother_period", &mut filter.smoother_period, defaults.smoother_period, warnings);
    period("trend_filter.roc_period", &mut filter.roc_period, defaults.roc_period, warnings);
    period("trend_filter.mom_ema_period", &mut filter.mom_ema_period, defaults.mom_ema_period, warnings);
    period(
        "trend_filter.volume_spike_window",
        &mut filter.volume_spike_window,
        defaults.volume_spike_window,
        warnings,
    );
    period("trend_filter.chandelier_period", &mut filter.chandelier_period, defaults.chandelier_period, warnings);
    positive(
        "trend_filter.volume_spike_multiplier",
        &mut filter.volume_spike_multiplier,
        defaults.volume_spike_multiplier,
        warnings,
    );
    positive(
        "trend_filter.chandelier_multiplier",
        &mut filter.chandelier_multiplier,
        defaults.chandelier_multiplier,
        warnings,
    );
    positive(
        "trend_filter.base_adx_threshold",
        &mut filter.base_adx_threshold,
        defaults.base_adx_threshold,
        warnings,
    );
    non_negative(
        "trend_filter.adx_volatility_multiplier",
        &mut filter.adx_volatility_multiplier,
        defaults.adx_volatility_multiplier,
        warnings,
    );
}

// ---------------------------------------------------------------------------
// Weight sets
// ---------------------------------------------------------------------------

fn sanitize_weights(config: &mut AnalyzerConfig, warnings: &mut Vec<String>) {
    let flags = config.indicators.clone();
    for (name, set) in config.weight_sets.iter_mut() {
        set.retain(|kind, weight| {
            if weight < Decimal::ZERO {
                warnings.push(format!("weight_sets.{name}.{kind}: negative weight {weight} removed"));
                false
            } else if !flags.is_enabled(kind) {
                warnings.push(format!("weight_sets.{name}.{kind}: indicator disabled, weight removed"));
                false
            } else {
                true
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn period(name: &str, value: &mut u32, default: u32, warnings: &mut Vec<String>) {
    if *value == 0 {
        warnings.push(format!("{name}: must be > 0, using {default}"));
        *value = default;
    }
}

fn nonzero(name: &str, value: &mut usize, default: usize, warnings: &mut Vec<String>) {
    if *value == 0 {
        warnings.push(format!("{name}: must be > 0, using {default}"));
        *value = default;
    }
}

fn positive(name: &str, value: &mut Decimal, default: Decimal, warnings: &mut Vec<String>) {
    if *value <= Decimal::ZERO {
        warnings.push(format!("{name}: must be > 0 (got {value}), using {default}"));
        *value = default;
    }
}

fn non_negative(name: &str, value: &mut Decimal, default: Decimal, warnings: &mut Vec<String>) {
    if *value < Decimal::ZERO {
        warnings.push(format!("{name}: must be >= 0 (got {value}), using {default}"));
        *value = default;
    }
}

fn ordered_band(
    name: &str,
    (low, high): (&mut Decimal, &mut Decimal),
    (default_low, default_high): (Decimal, Decimal),
    warnings: &mut Vec<String>,
) {
    if *low >= *high {
        warnings.push(format!(
            "{name}: oversold ({low}) must be < overbought ({high}), using {default_low}/{default_high}"
        ));
        *low = default_low;
        *high = default_high;
    }
}
