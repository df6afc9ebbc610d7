//! Rolling VWAP

use crate::series::NumericSeries;

/// Rolling sum(close * volume) / rolling sum(volume). Early bars use the
/// available history; a zero volume sum falls back to the bar's close.
pub fn calculate_vwap(close: &NumericSeries, volume: &NumericSeries, window: usize) -> NumericSeries {
    let price_volume = close.mul(volume).rolling_sum(window, 1);
    let total_volume = volume.rolling_sum(window, 1);
    price_volume.div(&total_volume).fill_none_from(close)
}
