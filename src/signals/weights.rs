//! Weight-set selection by volatility regime

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{AnalyzerConfig, WeightSet};
use crate::models::analysis::VolatilityRegime;

/// Weight set for the regime implied by `atr`, restricted to enabled
/// indicators with non-negative weights. A missing set scores nothing.
pub fn select_weight_set(config: &AnalyzerConfig, atr: Decimal) -> (VolatilityRegime, WeightSet) {
    let regime = VolatilityRegime::classify(atr, config.atr_change_threshold);
    let weights = match config.weight_set(regime.weight_set_name()) {
        Some(set) => active_weights(config, set),
        None => {
            warn!(weight_set = %regime, "weight set missing from config, scoring with no weights");
            WeightSet::new()
        }
    };
    debug!(%atr, threshold = %config.atr_change_threshold, %regime, "weight set selected");
    (regime, weights)
}

pub fn active_weights(config: &AnalyzerConfig, set: &WeightSet) -> WeightSet {
    let mut active = set.clone();
    active.retain(|kind, weight| config.is_enabled(kind) && weight >= Decimal::ZERO);
    active
}
