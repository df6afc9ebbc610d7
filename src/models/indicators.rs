use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::indicators::registry::IndicatorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

/// Latest value of one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndicatorValue {
    Scalar {
        value: Decimal,
    },
    EmaAlignment {
        score: Decimal,
    },
    VolumeConfirmation {
        confirmed: bool,
        volume: Decimal,
        average: Decimal,
    },
    Divergence {
        bias: Bias,
    },
    Macd {
        macd: Decimal,
        signal: Decimal,
        histogram: Decimal,
    },
    Stochastic {
        k: Decimal,
        d: Decimal,
    },
    Adx {
        adx: Decimal,
        plus_di: Decimal,
        minus_di: Decimal,
    },
    Vortex {
        plus: Decimal,
        minus: Decimal,
    },
    Bands {
        upper: Decimal,
        middle: Decimal,
        lower: Decimal,
    },
}

/// Display label and direction for one indicator reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub bias: Bias,
    pub label: String,
}

impl Interpretation {
    fn new(bias: Bias, label: &str) -> Self {
        Self {
            bias,
            label: label.to_string(),
        }
    }
}

impl IndicatorValue {
    pub fn scalar(value: Decimal) -> Self {
        IndicatorValue::Scalar { value }
    }

    /// Primary number of the reading, used for compact summaries.
    pub fn primary(&self) -> Option<Decimal> {
        match self {
            IndicatorValue::Scalar { value } => Some(*value),
            IndicatorValue::EmaAlignment { score } => Some(*score),
            IndicatorValue::VolumeConfirmation { volume, .. } => Some(*volume),
            IndicatorValue::Divergence { .. } => None,
            IndicatorValue::Macd { histogram, .. } => Some(*histogram),
            IndicatorValue::Stochastic { k, .. } => Some(*k),
            IndicatorValue::Adx { adx, .. } => Some(*adx),
            IndicatorValue::Vortex { plus, minus } => Some(*plus - *minus),
            IndicatorValue::Bands { middle, .. } => Some(*middle),
        }
    }

    /// Human-oriented reading of the value for display collaborators.
    /// Thresholds are the conventional ones for each oscillator.
    pub fn interpret(&self, kind: IndicatorKind, current_price: Decimal) -> Interpretation {
        use Bias::*;
        match (kind, self) {
            (IndicatorKind::Rsi, IndicatorValue::Scalar { value })
            | (IndicatorKind::Mfi, IndicatorValue::Scalar { value }) => {
                let (low, high) = if kind == IndicatorKind::Rsi {
                    (dec!(30), dec!(70))
                } else {
                    (dec!(20), dec!(80))
                };
                if *value < low {
                    Interpretation::new(Bullish, "Oversold")
                } else if *value > high {
                    Interpretation::new(Bearish, "Overbought")
                } else {
                    Interpretation::new(Neutral, "Neutral")
                }
            }
            (IndicatorKind::WilliamsR, IndicatorValue::Scalar { value }) => {
                if *value < dec!(-80) {
                    Interpretation::new(Bullish, "Oversold")
                } else if *value > dec!(-20) {
                    Interpretation::new(Bearish, "Overbought")
                } else {
                    Interpretation::new(Neutral, "Neutral")
                }
            }
            (IndicatorKind::Cci, IndicatorValue::Scalar { value }) => {
                if *value < dec!(-100) {
                    Interpretation::new(Bullish, "Oversold")
                } else if *value > dec!(100) {
                    Interpretation::new(Bearish, "Overbought")
                } else {
                    Interpretation::new(Neutral, "Neutral")
                }
            }
            (IndicatorKind::Psar, IndicatorValue::Scalar { value })
            | (IndicatorKind::Vwap, IndicatorValue::Scalar { value })
            | (IndicatorKind::Sma10, IndicatorValue::Scalar { value }) => {
                if current_price > *value {
                    Interpretation::new(Bullish, "Price Above")
                } else if current_price < *value {
                    Interpretation::new(Bearish, "Price Below")
                } else {
                    Interpretation::new(Neutral, "At Price")
                }
            }
            (_, IndicatorValue::Scalar { value }) => {
                if *value > Decimal::ZERO {
                    Interpretation::new(Bullish, "Positive")
                } else if *value < Decimal::ZERO {
                    Interpretation::new(Bearish, "Negative")
                } else {
                    Interpretation::new(Neutral, "Flat")
                }
            }
            (_, IndicatorValue::EmaAlignment { score }) => {
                if *score > Decimal::ZERO {
                    Interpretation::new(Bullish, "Aligned Up")
                } else if *score < Decimal::ZERO {
                    Interpretation::new(Bearish, "Aligned Down")
                } else {
                    Interpretation::new(Neutral, "Mixed")
                }
            }
            (_, IndicatorValue::VolumeConfirmation { confirmed, .. }) => {
                if *confirmed {
                    Interpretation::new(Bullish, "High Volume")
                } else {
                    Interpretation::new(Neutral, "Normal Volume")
                }
            }
            (_, IndicatorValue::Divergence { bias }) => match bias {
                Bullish => Interpretation::new(Bullish, "Bullish Divergence"),
                Bearish => Interpretation::new(Bearish, "Bearish Divergence"),
                Neutral => Interpretation::new(Neutral, "None"),
            },
            (_, IndicatorValue::Macd { histogram, .. }) => {
                if *histogram > Decimal::ZERO {
                    Interpretation::new(Bullish, "Bullish")
                } else if *histogram < Decimal::ZERO {
                    Interpretation::new(Bearish, "Bearish")
                } else {
                    Interpretation::new(Neutral, "Flat")
                }
            }
            (_, IndicatorValue::Stochastic { k, d }) => {
                if *k < dec!(20) && *k > *d {
                    Interpretation::new(Bullish, "Oversold")
                } else if *k > dec!(80) && *k < *d {
                    Interpretation::new(Bearish, "Overbought")
                } else {
                    Interpretation::new(Neutral, "Neutral")
                }
            }
            (_, IndicatorValue::Adx { adx, plus_di, minus_di }) => {
                if *adx < dec!(25) {
                    Interpretation::new(Neutral, "Weak Trend")
                } else if plus_di > minus_di {
                    Interpretation::new(Bullish, "Strong Uptrend")
                } else {
                    Interpretation::new(Bearish, "Strong Downtrend")
                }
            }
            (_, IndicatorValue::Vortex { plus, minus }) => {
                if plus > minus {
                    Interpretation::new(Bullish, "Bullish")
                } else if plus < minus {
                    Interpretation::new(Bearish, "Bearish")
                } else {
                    Interpretation::new(Neutral, "Neutral")
                }
            }
            (_, IndicatorValue::Bands { upper, lower, .. }) => {
                if current_price > *upper {
                    Interpretation::new(Bearish, "Above Upper Band")
                } else if current_price < *lower {
                    Interpretation::new(Bullish, "Below Lower Band")
                } else {
                    Interpretation::new(Neutral, "In Band")
                }
            }
        }
    }
}

/// Every computed indicator of one cycle. A `None` entry marks an indicator
/// that was enabled but produced no value (short window or failure).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValues {
    values: BTreeMap<IndicatorKind, Option<IndicatorValue>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: IndicatorKind, value: Option<IndicatorValue>) {
        self.values.insert(kind, value);
    }

    pub fn get(&self, kind: IndicatorKind) -> Option<&IndicatorValue> {
        self.values.get(&kind).and_then(Option::as_ref)
    }

    pub fn contains(&self, kind: IndicatorKind) -> bool {
        self.values.contains_key(&kind)
    }

    /// Enabled indicators that have no value this cycle.
    pub fn unavailable(&self) -> Vec<IndicatorKind> {
        self.values
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IndicatorKind, Option<&IndicatorValue>)> + '_ {
        self.values.iter().map(|(k, v)| (*k, v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
