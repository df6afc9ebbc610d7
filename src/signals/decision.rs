//! Action decision and ATR-based protective levels

use rust_decimal::Decimal;

use crate::models::signal::SignalAction;

/// BUY at or above `+threshold`, SELL at or below `-threshold`, HOLD between.
pub fn decide_action(raw_score: Decimal, threshold: Decimal) -> SignalAction {
    if raw_score >= threshold {
        SignalAction::Buy
    } else if raw_score <= -threshold {
        SignalAction::Sell
    } else {
        SignalAction::Hold
    }
}

/// Stop-loss and take-profit as ATR multiples away from the entry.
/// Absent for HOLD or a non-positive ATR.
pub fn protective_levels(
    action: SignalAction,
    entry: Decimal,
    atr: Decimal,
    stop_loss_multiple: Decimal,
    take_profit_multiple: Decimal,
) -> (Option<Decimal>, Option<Decimal>) {
    if atr <= Decimal::ZERO {
        return (None, None);
    }
    let stop_distance = atr * stop_loss_multiple;
    let target_distance = atr * take_profit_multiple;
    match action {
        SignalAction::Buy => (Some(entry - stop_distance), Some(entry + target_distance)),
        SignalAction::Sell => (Some(entry + stop_distance), Some(entry - target_distance)),
        SignalAction::Hold => (None, None),
    }
}
