//! SuperSmoother filter over a full series

use crate::series::NumericSeries;
use crate::state::SuperSmoother;

/// Filter the series and return the final filter state for incremental use.
/// Undefined inputs stay undefined and do not advance the filter.
pub fn calculate_super_smoother_with_state(
    series: &NumericSeries,
    period: usize,
) -> (NumericSeries, Option<SuperSmoother>) {
    let Some(mut filter) = SuperSmoother::new(period) else {
        return (NumericSeries::undefined(series.len()), None);
    };
    let out = series.scan(|value| value.map(|v| filter.update(v)));
    (out, Some(filter))
}

pub fn calculate_super_smoother(series: &NumericSeries, period: usize) -> NumericSeries {
    calculate_super_smoother_with_state(series, period).0
}
