//! FVE: rolling sum of EMA(close) * SMA(volume)

use crate::indicators::trend::ema::{calculate_ema, calculate_sma};
use crate::series::NumericSeries;

/// All positions are undefined when fewer than `window` bars exist.
pub fn calculate_fve(close: &NumericSeries, volume: &NumericSeries, window: usize) -> NumericSeries {
    if window == 0 || close.len() < window {
        return NumericSeries::undefined(close.len());
    }
    calculate_ema(close, window)
        .mul(&calculate_sma(volume, window))
        .rolling_sum(window, window)
}
