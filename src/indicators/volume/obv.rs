//! On-Balance Volume

use rust_decimal::Decimal;

use crate::series::NumericSeries;

/// Running volume total, seeded with the first bar's volume. Adds the bar's
/// volume when the close rises, subtracts it when the close falls.
pub fn calculate_obv(close: &NumericSeries, volume: &NumericSeries) -> NumericSeries {
    let mut out = NumericSeries::new();
    let mut total: Option<Decimal> = None;
    for i in 0..close.len() {
        let next = match (total, volume.get(i)) {
            (None, Some(v)) => Some(v),
            (Some(t), Some(v)) => match (close.get(i), i.checked_sub(1).and_then(|p| close.get(p))) {
                (Some(c), Some(prev)) if c > prev => t.checked_add(v),
                (Some(c), Some(prev)) if c < prev => t.checked_sub(v),
                _ => Some(t),
            },
            (t, None) => t,
        };
        total = next;
        out.push(total);
    }
    out
}
