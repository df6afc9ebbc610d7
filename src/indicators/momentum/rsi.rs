//! RSI (Relative Strength Index) indicator

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::indicators::trend::ema::{calculate_ema, calculate_wilder};
use crate::series::NumericSeries;

/// RSI reported when the average loss is zero. No losses carries no
/// directional information, so this is the midpoint rather than 100.
pub const RSI_NEUTRAL: Decimal = dec!(50);

/// Gains and losses from consecutive closes. The first bar contributes 0 to both.
pub fn gains_and_losses(close: &NumericSeries) -> (NumericSeries, NumericSeries) {
    let delta = close.diff(1).fill_none(Decimal::ZERO);
    let gains = delta.map(|d| Some(d.max(Decimal::ZERO)));
    let losses = delta.map(|d| Some((-d).max(Decimal::ZERO)));
    (gains, losses)
}

/// RSI = 100 - 100 / (1 + avg_gain / avg_loss)
///
/// A gain/loss ratio too large to represent reads 100, the limit of the formula.
pub fn rsi_from_averages(avg_gain: Decimal, avg_loss: Decimal) -> Decimal {
    if avg_loss.is_zero() {
        return RSI_NEUTRAL;
    }
    avg_gain
        .checked_div(avg_loss)
        .and_then(|rs| Decimal::ONE.checked_add(rs))
        .and_then(|denom| Decimal::ONE_HUNDRED.checked_div(denom))
        .and_then(|share| Decimal::ONE_HUNDRED.checked_sub(share))
        .unwrap_or(Decimal::ONE_HUNDRED)
}

/// RSI with EMA-smoothed gains and losses.
pub fn calculate_rsi(close: &NumericSeries, window: usize) -> NumericSeries {
    let (gains, losses) = gains_and_losses(close);
    let avg_gain = calculate_ema(&gains, window);
    let avg_loss = calculate_ema(&losses, window);
    avg_gain.zip_with(&avg_loss, |g, l| Some(rsi_from_averages(g, l)))
}

/// RSI with Wilder-smoothed gains and losses, as advanced by the incremental engine
pub fn calculate_wilder_rsi(close: &NumericSeries, period: usize) -> NumericSeries {
    let (gains, losses) = gains_and_losses(close);
    let avg_gain = calculate_wilder(&gains, period);
    let avg_loss = calculate_wilder(&losses, period);
    avg_gain.zip_with(&avg_loss, |g, l| Some(rsi_from_averages(g, l)))
}
