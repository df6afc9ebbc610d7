//! Parabolic SAR

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::series::NumericSeries;
use crate::state::PsarState;

pub const DEFAULT_ACCELERATION: Decimal = dec!(0.02);
pub const DEFAULT_MAX_ACCELERATION: Decimal = dec!(0.2);

/// Full-history PSAR. Returns the series and the state after the last bar so
/// the incremental engine can continue from it.
///
/// The first defined bar reads its close; the second decides the trend
/// (up only when its close is higher).
pub fn calculate_psar_with_state(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
    acceleration: Decimal,
    max_acceleration: Decimal,
) -> (NumericSeries, Option<PsarState>) {
    let mut state: Option<PsarState> = None;
    let mut out = NumericSeries::new();
    for i in 0..close.len() {
        let (Some(h), Some(l), Some(c)) = (high.get(i), low.get(i), close.get(i)) else {
            out.push(None);
            continue;
        };
        let sar = match state.as_mut() {
            Some(s) => s.update(h, l, c),
            None => {
                let seeded = PsarState::seed(h, l, c, acceleration, max_acceleration);
                let sar = seeded.sar();
                state = Some(seeded);
                sar
            }
        };
        out.push_value(sar);
    }
    (out.forward_fill(), state)
}

pub fn calculate_psar(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
    acceleration: Decimal,
    max_acceleration: Decimal,
) -> NumericSeries {
    calculate_psar_with_state(high, low, close, acceleration, max_acceleration).0
}

/// PSAR with the conventional 0.02 / 0.2 acceleration
pub fn calculate_psar_default(high: &NumericSeries, low: &NumericSeries, close: &NumericSeries) -> NumericSeries {
    calculate_psar(high, low, close, DEFAULT_ACCELERATION, DEFAULT_MAX_ACCELERATION)
}
