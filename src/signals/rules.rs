//! Per-indicator scoring rules

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::AnalyzerConfig;
use crate::indicators::registry::IndicatorKind;
use crate::models::indicators::{Bias, IndicatorValue};

const HALF: Decimal = dec!(0.5);

/// What one rule contributes. `share` scales the indicator's weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Bullish { condition: &'static str, share: Decimal },
    Bearish { condition: &'static str, share: Decimal },
    Neutral,
}

impl RuleOutcome {
    fn bullish(condition: &'static str) -> Self {
        RuleOutcome::Bullish {
            condition,
            share: Decimal::ONE,
        }
    }

    fn bearish(condition: &'static str) -> Self {
        RuleOutcome::Bearish {
            condition,
            share: Decimal::ONE,
        }
    }

    /// Signed contribution for `weight`, with the triggered condition.
    pub fn contribution(&self, weight: Decimal) -> Option<(&'static str, Decimal)> {
        match *self {
            RuleOutcome::Bullish { condition, share } => Some((condition, weight * share)),
            RuleOutcome::Bearish { condition, share } => Some((condition, -(weight * share))),
            RuleOutcome::Neutral => None,
        }
    }
}

/// Apply the rule for `kind` to its latest value. Indicators without a
/// scoring rule (VWAP, OBV, ADI, CCI, %R, ADX, FVE, SMA, MFI, momentum) are
/// informational and always neutral.
pub fn evaluate_rule(
    kind: IndicatorKind,
    value: &IndicatorValue,
    current_price: Decimal,
    config: &AnalyzerConfig,
) -> RuleOutcome {
    match (kind, value) {
        (IndicatorKind::EmaAlignment, IndicatorValue::EmaAlignment { score }) => ema_alignment(*score, config),
        (IndicatorKind::VolumeConfirmation, IndicatorValue::VolumeConfirmation { confirmed, .. }) => {
            if *confirmed {
                RuleOutcome::bullish("Volume Confirmation")
            } else {
                RuleOutcome::Neutral
            }
        }
        (IndicatorKind::Divergence, IndicatorValue::Divergence { bias }) => match bias {
            Bias::Bullish => RuleOutcome::bullish("Bullish Divergence"),
            Bias::Bearish => RuleOutcome::bearish("Bearish Divergence"),
            Bias::Neutral => RuleOutcome::Neutral,
        },
        (IndicatorKind::StochRsi, IndicatorValue::Stochastic { k, d }) => {
            if *k < config.stoch_rsi_oversold_threshold && k > d {
                RuleOutcome::bullish("StochRSI Oversold")
            } else if *k > config.stoch_rsi_overbought_threshold && k < d {
                RuleOutcome::bearish("StochRSI Overbought")
            } else {
                RuleOutcome::Neutral
            }
        }
        (IndicatorKind::Rsi, IndicatorValue::Scalar { value }) => {
            if *value < config.rsi_oversold {
                RuleOutcome::bullish("RSI Oversold")
            } else if *value > config.rsi_overbought {
                RuleOutcome::bearish("RSI Overbought")
            } else {
                RuleOutcome::Neutral
            }
        }
        (IndicatorKind::Macd, IndicatorValue::Macd { histogram, .. }) => {
            sign_rule(*histogram, "MACD Bullish", "MACD Bearish")
        }
        (IndicatorKind::Psar, IndicatorValue::Scalar { value }) => {
            sign_rule(current_price - *value, "PSAR Bullish", "PSAR Bearish")
        }
        (IndicatorKind::StochasticOscillator, IndicatorValue::Stochastic { k, d }) => {
            if *k < config.stoch_osc_oversold && k > d {
                RuleOutcome::bullish("Stoch Osc Oversold")
            } else if *k > config.stoch_osc_overbought && k < d {
                RuleOutcome::bearish("Stoch Osc Overbought")
            } else {
                RuleOutcome::Neutral
            }
        }
        (IndicatorKind::Cmf, IndicatorValue::Scalar { value }) => sign_rule(*value, "CMF Positive", "CMF Negative"),
        (IndicatorKind::AwesomeOscillator, IndicatorValue::Scalar { value }) => {
            sign_rule(*value, "AO Bullish", "AO Bearish")
        }
        (IndicatorKind::Vortex, IndicatorValue::Vortex { plus, minus }) => {
            sign_rule(*plus - *minus, "VI Bullish Crossover", "VI Bearish Crossover")
        }
        (IndicatorKind::BollingerBands, IndicatorValue::Bands { upper, lower, .. }) => {
            if current_price > *upper {
                RuleOutcome::bearish("BB Overbought")
            } else if current_price < *lower {
                RuleOutcome::bullish("BB Oversold")
            } else {
                RuleOutcome::Neutral
            }
        }
        _ => RuleOutcome::Neutral,
    }
}

fn ema_alignment(score: Decimal, config: &AnalyzerConfig) -> RuleOutcome {
    if score == Decimal::ONE {
        RuleOutcome::bullish("EMA Alignment (Bullish)")
    } else if score == Decimal::NEGATIVE_ONE {
        RuleOutcome::bearish("EMA Alignment (Bearish)")
    } else if !config.ema_crossover_partial_weight {
        RuleOutcome::Neutral
    } else if score == HALF {
        RuleOutcome::Bullish {
            condition: "EMA Crossover (Bullish)",
            share: HALF,
        }
    } else if score == -HALF {
        RuleOutcome::Bearish {
            condition: "EMA Crossover (Bearish)",
            share: HALF,
        }
    } else {
        RuleOutcome::Neutral
    }
}

fn sign_rule(value: Decimal, bullish: &'static str, bearish: &'static str) -> RuleOutcome {
    if value > Decimal::ZERO {
        RuleOutcome::bullish(bullish)
    } else if value < Decimal::ZERO {
        RuleOutcome::bearish(bearish)
    } else {
        RuleOutcome::Neutral
    }
}
