//! Money-flow indicators: ADI, CMF, MFI

use rust_decimal::Decimal;

use crate::indicators::momentum::oscillators::typical_price;
use crate::series::NumericSeries;

/// Money-Flow Multiplier = ((close - low) - (high - close)) / (high - low),
/// 0 on a zero range.
pub fn money_flow_multiplier(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
) -> NumericSeries {
    close
        .sub(low)
        .sub(&high.sub(close))
        .div_or(&high.sub(low), Decimal::ZERO)
}

/// Accumulation/Distribution: cumulative sum of MFM * volume
pub fn calculate_adi(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
    volume: &NumericSeries,
) -> NumericSeries {
    money_flow_multiplier(high, low, close).mul(volume).cumsum()
}

/// Chaikin Money Flow: window sum of MFM * volume over window sum of volume.
/// Needs a full window; a zero volume sum reads 0.
pub fn calculate_cmf(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
    volume: &NumericSeries,
    window: usize,
) -> NumericSeries {
    let flow = money_flow_multiplier(high, low, close)
        .mul(volume)
        .rolling_sum(window, window);
    flow.div_or(&volume.rolling_sum(window, window), Decimal::ZERO)
}

/// Money Flow Index: raw money flow split by typical-price direction, then
/// 100 - 100 / (1 + positive_sum / negative_sum). A zero negative sum reads 0.
pub fn calculate_mfi(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
    volume: &NumericSeries,
    window: usize,
) -> NumericSeries {
    let tp = typical_price(high, low, close);
    let raw = tp.mul(volume);
    let direction = tp.diff(1).fill_none(Decimal::ZERO);

    let positive = raw
        .zip_with(&direction, |flow, d| Some(if d > Decimal::ZERO { flow } else { Decimal::ZERO }))
        .rolling_sum(window, 1);
    let negative = raw
        .zip_with(&direction, |flow, d| Some(if d < Decimal::ZERO { flow } else { Decimal::ZERO }))
        .rolling_sum(window, 1);

    positive
        .zip_with(&negative, |pos, neg| {
            if neg.is_zero() {
                return Some(Decimal::ZERO);
            }
            let ratio = pos.checked_div(neg)?;
            Some(Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (Decimal::ONE + ratio))
        })
        .fill_none(Decimal::ZERO)
}
