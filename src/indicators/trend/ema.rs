//! Moving averages: SMA, EMA (adjust=False) and Wilder smoothing

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::series::NumericSeries;
use crate::state::{EmaState, WilderState};

/// Simple moving average with `min_periods = 1`: early bars average whatever
/// history exists.
pub fn calculate_sma(series: &NumericSeries, window: usize) -> NumericSeries {
    series.rolling_mean(window, 1)
}

/// Recursive EMA with alpha = 2 / (span + 1), seeded with the first defined
/// value. An undefined input repeats the previous output.
pub fn calculate_ema(series: &NumericSeries, span: usize) -> NumericSeries {
    if span == 0 {
        return NumericSeries::undefined(series.len());
    }
    let mut state = EmaState::new(span);
    series.scan(|value| match value {
        Some(v) => Some(state.update(v)),
        None => state.value(),
    })
}

/// Wilder smoothing, `(prev * (period - 1) + current) / period`, seeded with
/// the first defined value.
pub fn calculate_wilder(series: &NumericSeries, period: usize) -> NumericSeries {
    if period == 0 {
        return NumericSeries::undefined(series.len());
    }
    let mut state = WilderState::new(period);
    series.scan(|value| match value {
        Some(v) => Some(state.update(v)),
        None => state.value(),
    })
}

/// EMA alignment of the latest bar.
///
/// * `1` / `-1`: close > short EMA > long EMA (or the reverse) on both the
///   latest and the prior bar
/// * `0.5` / `-0.5`: the short EMA crossed above / below the long EMA on the
///   latest bar
/// * `0` otherwise
///
/// `None` until `long_span` bars (and at least two) are available.
pub fn calculate_ema_alignment(
    close: &NumericSeries,
    short_span: usize,
    long_span: usize,
) -> Option<Decimal> {
    if close.len() < long_span.max(2) {
        return None;
    }
    let short = calculate_ema(close, short_span);
    let long = calculate_ema(close, long_span);

    let (c0, c1) = (close.from_end(0)?, close.from_end(1)?);
    let (s0, s1) = (short.from_end(0)?, short.from_end(1)?);
    let (l0, l1) = (long.from_end(0)?, long.from_end(1)?);

    let bullish = |c: Decimal, s: Decimal, l: Decimal| c > s && s > l;
    let bearish = |c: Decimal, s: Decimal, l: Decimal| c < s && s < l;

    let alignment = if bullish(c0, s0, l0) && bullish(c1, s1, l1) {
        Decimal::ONE
    } else if bearish(c0, s0, l0) && bearish(c1, s1, l1) {
        Decimal::NEGATIVE_ONE
    } else if s0 > l0 && s1 <= l1 {
        dec!(0.5)
    } else if s0 < l0 && s1 >= l1 {
        dec!(-0.5)
    } else {
        Decimal::ZERO
    };
    Some(alignment)
}
