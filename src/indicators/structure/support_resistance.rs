//! Fibonacci retracement, pivot points and nearest support/resistance

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::levels::{Level, LevelKind, LevelSet};

/// Decimal places kept on computed level prices.
pub const LEVEL_PRECISION: u32 = 5;

pub const FIBONACCI_RATIOS: [(&str, Decimal); 6] = [
    ("Fib 23.6%", dec!(0.236)),
    ("Fib 38.2%", dec!(0.382)),
    ("Fib 50.0%", dec!(0.5)),
    ("Fib 61.8%", dec!(0.618)),
    ("Fib 78.6%", dec!(0.786)),
    ("Fib 88.6%", dec!(0.886)),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearestLevels {
    pub supports: Vec<Level>,
    pub resistances: Vec<Level>,
}

/// Retracement levels `high - (high - low) * ratio`, classified against
/// `current_price`. A non-positive range yields an empty set.
pub fn calculate_fibonacci_retracement(high: Decimal, low: Decimal, current_price: Decimal) -> LevelSet {
    let diff = high - low;
    if diff <= Decimal::ZERO {
        return LevelSet::new();
    }
    let levels = FIBONACCI_RATIOS
        .iter()
        .map(|(label, ratio)| Level::new(*label, (high - diff * *ratio).round_dp(LEVEL_PRECISION)));
    LevelSet::classify(levels, current_price)
}

/// Standard floor-trader pivots: Pivot, R1, S1, R2, S2, R3, S3.
pub fn calculate_pivot_points(high: Decimal, low: Decimal, close: Decimal) -> Vec<Level> {
    let pivot = (high + low + close) / Decimal::from(3);
    let range = high - low;
    [
        ("Pivot", pivot),
        ("R1", Decimal::TWO * pivot - low),
        ("S1", Decimal::TWO * pivot - high),
        ("R2", pivot + range),
        ("S2", pivot - range),
        ("R3", high + Decimal::TWO * (pivot - low)),
        ("S3", low - Decimal::TWO * (high - pivot)),
    ]
    .into_iter()
    .map(|(label, price)| Level::new(label, price.round_dp(LEVEL_PRECISION)))
    .collect()
}

/// The `num_levels` closest supports below and resistances above
/// `current_price`, nearest first.
pub fn find_nearest_levels(levels: &LevelSet, current_price: Decimal, num_levels: usize) -> NearestLevels {
    let mut supports: Vec<Level> = Vec::new();
    let mut resistances: Vec<Level> = Vec::new();
    for level in levels.support.iter().chain(levels.resistance.iter()) {
        match LevelKind::classify(level.price, current_price) {
            Some(LevelKind::Support) => supports.push(level.clone()),
            Some(LevelKind::Resistance) => resistances.push(level.clone()),
            None => {}
        }
    }
    supports.sort_by_key(|l| current_price - l.price);
    resistances.sort_by_key(|l| l.price - current_price);
    supports.truncate(num_levels);
    resistances.truncate(num_levels);
    NearestLevels { supports, resistances }
}
