//! Price oscillators: CCI, Williams %R, Momentum, Awesome Oscillator

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::indicators::trend::ema::calculate_sma;
use crate::series::NumericSeries;

pub const CCI_CONSTANT: Decimal = dec!(0.015);

pub fn typical_price(high: &NumericSeries, low: &NumericSeries, close: &NumericSeries) -> NumericSeries {
    high.add(low).add(close).map(|v| v.checked_div(Decimal::from(3)))
}

/// CCI = (TP - SMA(TP)) / (constant * mean absolute deviation of TP).
/// The deviation needs a full window; a zero or missing deviation reads 0.
pub fn calculate_cci(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
    window: usize,
    constant: Decimal,
) -> NumericSeries {
    let tp = typical_price(high, low, close);
    let mean = tp.rolling_mean(window, 1);
    let deviation = tp.rolling_mean_abs_dev(window, window).scale(constant);
    tp.sub(&mean)
        .div_or(&deviation, Decimal::ZERO)
        .fill_none(Decimal::ZERO)
}

/// Williams %R = -100 * (highest_high - close) / (highest_high - lowest_low)
pub fn calculate_williams_r(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
    window: usize,
) -> NumericSeries {
    let highest = high.rolling_max(window, window);
    let lowest = low.rolling_min(window, window);
    highest
        .sub(close)
        .scale(dec!(-100))
        .div_or(&highest.sub(&lowest), Decimal::ZERO)
        .fill_none(Decimal::ZERO)
}

/// Momentum = 100 * (close - close[period ago]) / close[period ago]
pub fn calculate_momentum(close: &NumericSeries, period: usize) -> NumericSeries {
    let past = close.shift(period);
    close
        .sub(&past)
        .scale(Decimal::ONE_HUNDRED)
        .div_or(&past, Decimal::ZERO)
        .fill_none(Decimal::ZERO)
}

/// Percent rate of change `(price / base - 1) * 100`, 0 when the base is zero.
pub fn rate_of_change(price: Decimal, base: Decimal) -> Decimal {
    if base.is_zero() {
        return Decimal::ZERO;
    }
    price
        .checked_div(base)
        .and_then(|ratio| (ratio - Decimal::ONE).checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Rate of change against the close `period` bars back; 0 until that bar exists.
pub fn calculate_rate_of_change(close: &NumericSeries, period: usize) -> NumericSeries {
    close
        .zip_with(&close.shift(period), |price, base| Some(rate_of_change(price, base)))
        .fill_none(Decimal::ZERO)
}

/// AO = SMA(median, short) - SMA(median, long), median = (close + prev_close) / 2
pub fn calculate_awesome_oscillator(close: &NumericSeries, short: usize, long: usize) -> NumericSeries {
    let median = close
        .add(&close.shift(1))
        .map(|v| v.checked_div(Decimal::TWO));
    calculate_sma(&median, short).sub(&calculate_sma(&median, long))
}
