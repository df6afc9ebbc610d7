//! ADX (Average Directional Index) indicator

use rust_decimal::Decimal;

use crate::indicators::trend::ema::{calculate_ema, calculate_wilder};
use crate::indicators::volatility::atr::true_range;
use crate::series::NumericSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct AdxSeries {
    pub adx: NumericSeries,
    pub plus_di: NumericSeries,
    pub minus_di: NumericSeries,
}

/// +DM / -DM from consecutive highs and lows. A move only counts when it is
/// positive and larger than the opposite move. The first bar has no movement.
pub fn directional_movement(high: &NumericSeries, low: &NumericSeries) -> (NumericSeries, NumericSeries) {
    let up = high.diff(1);
    let down = low.shift(1).sub(low);
    let plus = up
        .zip_with(&down, |u, d| Some(if u > d && u > Decimal::ZERO { u } else { Decimal::ZERO }))
        .fill_none(Decimal::ZERO);
    let minus = down
        .zip_with(&up, |d, u| Some(if d > u && d > Decimal::ZERO { d } else { Decimal::ZERO }))
        .fill_none(Decimal::ZERO);
    (plus, minus)
}

/// DI and DX from smoothed movement and smoothed true range.
pub fn directional_index(
    plus_dm: Decimal,
    minus_dm: Decimal,
    smoothed_tr: Decimal,
) -> (Decimal, Decimal, Decimal) {
    let hundred = Decimal::ONE_HUNDRED;
    let (plus_di, minus_di) = if smoothed_tr.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (hundred * plus_dm / smoothed_tr, hundred * minus_dm / smoothed_tr)
    };
    let di_sum = plus_di + minus_di;
    let dx = if di_sum.is_zero() {
        Decimal::ZERO
    } else {
        hundred * (plus_di - minus_di).abs() / di_sum
    };
    (plus_di, minus_di, dx)
}

fn assemble(plus_sm: &NumericSeries, minus_sm: &NumericSeries, tr_sm: &NumericSeries) -> (NumericSeries, NumericSeries, NumericSeries) {
    let mut plus_di = NumericSeries::new();
    let mut minus_di = NumericSeries::new();
    let mut dx = NumericSeries::new();
    for i in 0..tr_sm.len() {
        match (plus_sm.get(i), minus_sm.get(i), tr_sm.get(i)) {
            (Some(p), Some(m), Some(tr)) => {
                let (pdi, mdi, d) = directional_index(p, m, tr);
                plus_di.push_value(pdi);
                minus_di.push_value(mdi);
                dx.push_value(d);
            }
            _ => {
                plus_di.push(None);
                minus_di.push(None);
                dx.push(None);
            }
        }
    }
    (plus_di, minus_di, dx)
}

/// ADX with EMA smoothing of DM, TR and DX.
pub fn calculate_adx(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
    window: usize,
) -> AdxSeries {
    let (plus_dm, minus_dm) = directional_movement(high, low);
    let tr = true_range(high, low, close);
    let (plus_di, minus_di, dx) = assemble(
        &calculate_ema(&plus_dm, window),
        &calculate_ema(&minus_dm, window),
        &calculate_ema(&tr, window),
    );
    AdxSeries {
        adx: calculate_ema(&dx, window),
        plus_di,
        minus_di,
    }
}

/// ADX with Wilder smoothing, the recursion the incremental engine advances.
pub fn calculate_wilder_adx(
    high: &NumericSeries,
    low: &NumericSeries,
    close: &NumericSeries,
    period: usize,
) -> AdxSeries {
    let (plus_dm, minus_dm) = directional_movement(high, low);
    let tr = true_range(high, low, close);
    let (plus_di, minus_di, dx) = assemble(
        &calculate_wilder(&plus_dm, period),
        &calculate_wilder(&minus_dm, period),
        &calculate_wilder(&tr, period),
    );
    AdxSeries {
        adx: calculate_wilder(&dx, period),
        plus_di,
        minus_di,
    }
}
