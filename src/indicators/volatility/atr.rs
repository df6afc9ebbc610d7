//! ATR (Average True Range) indicator

use crate::indicators::trend::ema::{calculate_ema, calculate_wilder};
use crate::series::NumericSeries;

/// True Range = max(high - low, |high - prev_close|, |low - prev_close|).
/// The first bar has no previous close and uses `high - low`.
pub fn true_range(high: &NumericSeries, low: &NumericSeries, close: &NumericSeries) -> NumericSeries {
    let prev_close = close.shift(1);
    let high_low = high.sub(low);
    let high_close = high.sub(&prev_close).abs().fill_none_from(&high_low);
    let low_close = low.sub(&prev_close).abs().fill_none_from(&high_low);
    high_low.max_with(&high_close).max_with(&low_close)
}

/// ATR = EMA(TR, window)
pub fn calculate_atr(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
    window: usize,
) -> NumericSeries {
    calculate_ema(&true_range(high, low, close), window)
}

/// ATR with Wilder smoothing, as advanced by the incremental engine
pub fn calculate_wilder_atr(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
    period: usize,
) -> NumericSeries {
    calculate_wilder(&true_range(high, low, close), period)
}
