//! Weighted score accumulation and confidence

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::config::{AnalyzerConfig, WeightSet};
use crate::models::indicators::IndicatorValues;
use crate::models::order_book::WallReport;
use crate::models::signal::SignalReason;
use crate::signals::rules::evaluate_rule;

pub const BULLISH_WALL_CONDITION: &str = "Order Book: Bullish Wall";
pub const BEARISH_WALL_CONDITION: &str = "Order Book: Bearish Wall";

/// Running signed score with the rules that moved it, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreCard {
    pub raw_score: Decimal,
    pub conditions: Vec<String>,
    pub reasons: Vec<SignalReason>,
}

impl ScoreCard {
    fn apply(&mut self, source: &str, condition: &str, delta: Decimal) {
        self.raw_score += delta;
        self.conditions.push(condition.to_string());
        self.reasons.push(SignalReason {
            source: source.to_string(),
            description: condition.to_string(),
            weight: delta,
        });
    }
}

/// Score every weighted indicator that has a value. Zero weights and
/// missing values are skipped.
pub fn score_indicators(
    values: &IndicatorValues,
    weights: &WeightSet,
    current_price: Decimal,
    config: &AnalyzerConfig,
) -> ScoreCard {
    let mut card = ScoreCard::default();
    for (kind, weight) in weights.iter() {
        if weight.is_zero() || !config.is_enabled(kind) {
            continue;
        }
        let Some(value) = values.get(kind) else {
            continue;
        };
        if let Some((condition, delta)) = evaluate_rule(kind, value, current_price, config).contribution(weight) {
            card.apply(kind.as_str(), condition, delta);
        }
    }
    card
}

/// Add the configured boosts for detected order-book walls.
pub fn apply_wall_boosts(card: &mut ScoreCard, walls: &WallReport, config: &AnalyzerConfig) {
    if walls.has_bullish_wall {
        card.apply("order_book", BULLISH_WALL_CONDITION, config.order_book_support_confidence_boost);
    }
    if walls.has_bearish_wall {
        card.apply("order_book", BEARISH_WALL_CONDITION, -config.order_book_resistance_confidence_boost);
    }
}

/// `|raw_score| / (total weight + support boost)`; 0 when the denominator is
/// not positive. Not clamped: a resistance boost larger than the support boost
/// can push a bearish score past 1.
pub fn calculate_confidence(raw_score: Decimal, total_weight: Decimal, support_boost: Decimal) -> f64 {
    let denominator = total_weight + support_boost;
    if denominator <= Decimal::ZERO {
        return 0.0;
    }
    raw_score
        .abs()
        .checked_div(denominator)
        .and_then(|ratio| ratio.to_f64())
        .unwrap_or(0.0)
}
