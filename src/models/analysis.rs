//! Per-cycle analysis report handed to display and persistence collaborators

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{HIGH_VOLATILITY, LOW_VOLATILITY};
use crate::models::indicators::IndicatorValues;
use crate::models::levels::{Level, LevelSet};
use crate::models::order_book::WallReport;
use crate::models::signal::TradeSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityRegime {
    LowVolatility,
    HighVolatility,
}

impl VolatilityRegime {
    /// Strictly above the threshold is high volatility.
    pub fn classify(atr: Decimal, threshold: Decimal) -> Self {
        if atr > threshold {
            VolatilityRegime::HighVolatility
        } else {
            VolatilityRegime::LowVolatility
        }
    }

    /// Name of the weight set used in this regime.
    pub fn weight_set_name(&self) -> &'static str {
        match self {
            VolatilityRegime::LowVolatility => LOW_VOLATILITY,
            VolatilityRegime::HighVolatility => HIGH_VOLATILITY,
        }
    }
}

impl fmt::Display for VolatilityRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.weight_set_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub signal: TradeSignal,
    pub regime: VolatilityRegime,
    pub atr: Decimal,
    pub indicators: IndicatorValues,
    pub levels: LevelSet,
    pub nearest_supports: Vec<Level>,
    pub nearest_resistances: Vec<Level>,
    pub walls: WallReport,
    pub bars_available: usize,
    pub min_bars_required: usize,
    pub data_sufficient: bool,
}

impl Analysis {
    /// Report for a cycle that had no candles at all.
    pub fn empty(current_price: Decimal, min_bars_required: usize) -> Self {
        Self {
            signal: TradeSignal::hold(current_price),
            regime: VolatilityRegime::LowVolatility,
            atr: Decimal::ZERO,
            indicators: IndicatorValues::new(),
            levels: LevelSet::new(),
            nearest_supports: Vec::new(),
            nearest_resistances: Vec::new(),
            walls: WallReport::default(),
            bars_available: 0,
            min_bars_required,
            data_sufficient: false,
        }
    }
}
