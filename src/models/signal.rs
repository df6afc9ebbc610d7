//! Trade signal emitted once per analysis cycle

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignalAction::Buy => "BUY",
            SignalAction::Sell => "SELL",
            SignalAction::Hold => "HOLD",
        };
        f.write_str(label)
    }
}

/// One triggered rule and its signed contribution to the raw score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReason {
    pub source: String,
    pub description: String,
    pub weight: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub action: SignalAction,
    pub confidence: f64,
    pub raw_score: Decimal,
    pub entry_price: Decimal,
    /// Triggered rule names in evaluation order.
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<SignalReason>,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
}

impl TradeSignal {
    pub fn hold(entry_price: Decimal) -> Self {
        Self {
            action: SignalAction::Hold,
            confidence: 0.0,
            raw_score: Decimal::ZERO,
            entry_price,
            conditions: Vec::new(),
            reasons: Vec::new(),
            stop_loss: None,
            take_profit: None,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.action != SignalAction::Hold
    }
}
