//! Vortex Indicator

use rust_decimal::Decimal;

use crate::indicators::volatility::atr::true_range;
use crate::series::NumericSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct VortexSeries {
    pub plus: NumericSeries,
    pub minus: NumericSeries,
}

/// +VI = rolling sum of |high change| over rolling sum of True Range,
/// -VI = the same with |low change|. A zero range sum reads 0.
pub fn calculate_vortex(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
    window: usize,
) -> VortexSeries {
    let vm_plus = high.diff(1).abs();
    let vm_minus = low.diff(1).abs();
    let tr_sum = true_range(high, low, close).rolling_sum(window, window);
    VortexSeries {
        plus: vm_plus.rolling_sum(window, window).div_or(&tr_sum, Decimal::ZERO),
        minus: vm_minus.rolling_sum(window, window).div_or(&tr_sum, Decimal::ZERO),
    }
}
