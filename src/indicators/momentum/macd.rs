//! MACD (Moving Average Convergence Divergence) indicator

use crate::indicators::trend::ema::calculate_ema;
use crate::models::indicators::Bias;
use crate::series::NumericSeries;

/// Bars required before histogram divergence is considered.
pub const DIVERGENCE_MIN_BARS: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: NumericSeries,
    pub signal: NumericSeries,
    pub histogram: NumericSeries,
}

/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
pub fn calculate_macd(close: &NumericSeries, fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let macd = calculate_ema(close, fast).sub(&calculate_ema(close, slow));
    let signal = calculate_ema(&macd, signal);
    MacdSeries {
        histogram: macd.sub(&signal),
        macd,
        signal,
    }
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(close: &NumericSeries) -> MacdSeries {
    calculate_macd(close, 12, 26, 9)
}

/// Price / histogram divergence between the latest bar and the bar
/// `lookback - 1` positions earlier.
///
/// Lower close with a higher histogram is bullish; higher close with a lower
/// histogram is bearish. `None` with fewer than [`DIVERGENCE_MIN_BARS`] bars.
pub fn detect_macd_divergence(
    close: &NumericSeries,
    histogram: &NumericSeries,
    lookback: usize,
) -> Option<Bias> {
    if close.len() < DIVERGENCE_MIN_BARS || lookback < 2 || close.len() < lookback {
        return None;
    }
    let back = lookback - 1;
    let (price_now, price_then) = (close.from_end(0)?, close.from_end(back)?);
    let (hist_now, hist_then) = (histogram.from_end(0)?, histogram.from_end(back)?);

    if price_now < price_then && hist_now > hist_then {
        Some(Bias::Bullish)
    } else if price_now > price_then && hist_now < hist_then {
        Some(Bias::Bearish)
    } else {
        Some(Bias::Neutral)
    }
}
