//! Bollinger Bands indicator

use rust_decimal::Decimal;

use crate::series::NumericSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub upper: NumericSeries,
    pub middle: NumericSeries,
    pub lower: NumericSeries,
}

/// Middle Band = SMA(window)
/// Upper/Lower Band = Middle ± std_mult * sample standard deviation
///
/// All three bands require a full window.
pub fn calculate_bollinger_bands(
    close: &NumericSeries,
    window: usize,
    std_mult: Decimal,
) -> BollingerSeries {
    let middle = close.rolling_mean(window, window);
    let width = close.rolling_std(window, window).scale(std_mult);
    BollingerSeries {
        upper: middle.add(&width),
        lower: middle.sub(&width),
        middle,
    }
}
