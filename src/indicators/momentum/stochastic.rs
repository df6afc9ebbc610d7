//! Stochastic Oscillator and Stochastic RSI

use rust_decimal::Decimal;

use crate::indicators::momentum::rsi::calculate_rsi;
use crate::indicators::trend::ema::calculate_sma;
use crate::series::NumericSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: NumericSeries,
    pub d: NumericSeries,
}

/// Position of `value` inside the rolling [lowest, highest] range, scaled to
/// 0..100. A zero range and an incomplete window both read 0.
fn range_position(
    value: &NumericSeries,
    lowest: &NumericSeries,
    highest: &NumericSeries,
) -> NumericSeries {
    value
        .sub(lowest)
        .scale(Decimal::ONE_HUNDRED)
        .div_or(&highest.sub(lowest), Decimal::ZERO)
        .fill_none(Decimal::ZERO)
}

/// %K = 100 * (close - lowest_low) / (highest_high - lowest_low) over `k_period`
/// %D = SMA(%K, d_period)
pub fn calculate_stochastic(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
    k_period: usize,
    d_period: usize,
) -> StochasticSeries {
    let lowest = low.rolling_min(k_period, k_period);
    let highest = high.rolling_max(k_period, k_period);
    let k = range_position(close, &lowest, &highest);
    StochasticSeries {
        d: calculate_sma(&k, d_period),
        k,
    }
}

/// Stochastic transform applied to RSI(rsi_period), then %K = SMA(raw, k_period)
/// and %D = SMA(%K, d_period).
pub fn calculate_stoch_rsi(
    close: &NumericSeries,
    rsi_period: usize,
    k_period: usize,
    d_period: usize,
) -> StochasticSeries {
    let rsi = calculate_rsi(close, rsi_period);
    let lowest = rsi.rolling_min(k_period, k_period);
    let highest = rsi.rolling_max(k_period, k_period);
    let raw = range_position(&rsi, &lowest, &highest);
    let k = calculate_sma(&raw, k_period);
    StochasticSeries {
        d: calculate_sma(&k, d_period),
        k,
    }
}
