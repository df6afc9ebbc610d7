//! Unit tests for per-indicator scoring rules

use confluence::config::AnalyzerConfig;
use confluence::indicators::registry::IndicatorKind;
use confluence::models::indicators::{Bias, IndicatorValue};
use confluence::signals::{evaluate_rule, RuleOutcome};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const PRICE: Decimal = dec!(100);

struct Case {
    name: &'static str,
    kind: IndicatorKind,
    value: IndicatorValue,
    price: Decimal,
    /// Signed contribution at weight 1, or None when the rule stays neutral.
    expected: Option<(&'static str, Decimal)>,
}

fn case(
    name: &'static str,
    kind: IndicatorKind,
    value: IndicatorValue,
    expected: Option<(&'static str, Decimal)>,
) -> Case {
    Case {
        name,
        kind,
        value,
        price: PRICE,
        expected,
    }
}

fn stoch(k: Decimal, d: Decimal) -> IndicatorValue {
    IndicatorValue::Stochastic { k, d }
}

fn bands(upper: Decimal, lower: Decimal) -> IndicatorValue {
    IndicatorValue::Bands {
        upper,
        middle: (upper + lower) / dec!(2),
        lower,
    }
}

fn run(cases: Vec<Case>) {
    let config = AnalyzerConfig::default();
    for c in cases {
        let outcome = evaluate_rule(c.kind, &c.value, c.price, &config);
        assert_eq!(outcome.contribution(Decimal::ONE), c.expected, "case: {}", c.name);
    }
}

#[test]
fn test_stoch_rsi_rule() {
    let kind = IndicatorKind::StochRsi;
    run(vec![
        case("oversold and rising", kind, stoch(dec!(15), dec!(10)), Some(("StochRSI Oversold", dec!(1)))),
        case("overbought and falling", kind, stoch(dec!(85), dec!(90)), Some(("StochRSI Overbought", dec!(-1)))),
        case("oversold but k == d", kind, stoch(dec!(15), dec!(15)), None),
        case("overbought but k == d", kind, stoch(dec!(85), dec!(85)), None),
        case("oversold but falling", kind, stoch(dec!(15), dec!(18)), None),
        case("overbought but rising", kind, stoch(dec!(85), dec!(82)), None),
        case("k at the oversold threshold", kind, stoch(dec!(20), dec!(10)), None),
        case("k at the overbought threshold", kind, stoch(dec!(80), dec!(90)), None),
        case("mid range", kind, stoch(dec!(50), dec!(40)), None),
    ]);
}

#[test]
fn test_stochastic_oscillator_rule() {
    let kind = IndicatorKind::StochasticOscillator;
    run(vec![
        case("oversold and rising", kind, stoch(dec!(10), dec!(5)), Some(("Stoch Osc Oversold", dec!(1)))),
        case("overbought and falling", kind, stoch(dec!(90), dec!(95)), Some(("Stoch Osc Overbought", dec!(-1)))),
        case("oversold but k == d", kind, stoch(dec!(10), dec!(10)), None),
        case("overbought but k == d", kind, stoch(dec!(90), dec!(90)), None),
        case("k at the oversold threshold", kind, stoch(dec!(20), dec!(5)), None),
        case("k at the overbought threshold", kind, stoch(dec!(80), dec!(95)), None),
    ]);
}

#[test]
fn test_rsi_rule() {
    let kind = IndicatorKind::Rsi;
    run(vec![
        case("oversold", kind, IndicatorValue::scalar(dec!(25)), Some(("RSI Oversold", dec!(1)))),
        case("overbought", kind, IndicatorValue::scalar(dec!(75)), Some(("RSI Overbought", dec!(-1)))),
        case("at 30", kind, IndicatorValue::scalar(dec!(30)), None),
        case("at 70", kind, IndicatorValue::scalar(dec!(70)), None),
        case("neutral 50", kind, IndicatorValue::scalar(dec!(50)), None),
    ]);
}

#[test]
fn test_bollinger_rule() {
    let kind = IndicatorKind::BollingerBands;
    run(vec![
        case("above upper band", kind, bands(dec!(99), dec!(90)), Some(("BB Overbought", dec!(-1)))),
        case("below lower band", kind, bands(dec!(110), dec!(101)), Some(("BB Oversold", dec!(1)))),
        case("price on the upper band", kind, bands(dec!(100), dec!(90)), None),
        case("price on the lower band", kind, bands(dec!(110), dec!(100)), None),
        case("inside the bands", kind, bands(dec!(105), dec!(95)), None),
        case("collapsed bands at price", kind, bands(dec!(100), dec!(100)), None),
    ]);
}

#[test]
fn test_sign_rules() {
    run(vec![
        case("cmf positive", IndicatorKind::Cmf, IndicatorValue::scalar(dec!(0.12)), Some(("CMF Positive", dec!(1)))),
        case("cmf negative", IndicatorKind::Cmf, IndicatorValue::scalar(dec!(-0.12)), Some(("CMF Negative", dec!(-1)))),
        case("cmf zero", IndicatorKind::Cmf, IndicatorValue::scalar(Decimal::ZERO), None),
        case("ao positive", IndicatorKind::AwesomeOscillator, IndicatorValue::scalar(dec!(3)), Some(("AO Bullish", dec!(1)))),
        case("ao negative", IndicatorKind::AwesomeOscillator, IndicatorValue::scalar(dec!(-3)), Some(("AO Bearish", dec!(-1)))),
        case("ao zero", IndicatorKind::AwesomeOscillator, IndicatorValue::scalar(Decimal::ZERO), None),
        case(
            "macd histogram positive",
            IndicatorKind::Macd,
            IndicatorValue::Macd { macd: dec!(1), signal: dec!(0.5), histogram: dec!(0.5) },
            Some(("MACD Bullish", dec!(1))),
        ),
        case(
            "macd histogram negative",
            IndicatorKind::Macd,
            IndicatorValue::Macd { macd: dec!(0.5), signal: dec!(1), histogram: dec!(-0.5) },
            Some(("MACD Bearish", dec!(-1))),
        ),
        case("price above psar", IndicatorKind::Psar, IndicatorValue::scalar(dec!(98)), Some(("PSAR Bullish", dec!(1)))),
        case("price below psar", IndicatorKind::Psar, IndicatorValue::scalar(dec!(102)), Some(("PSAR Bearish", dec!(-1)))),
        case("price on psar", IndicatorKind::Psar, IndicatorValue::scalar(PRICE), None),
        case(
            "plus vi above minus",
            IndicatorKind::Vortex,
            IndicatorValue::Vortex { plus: dec!(1.1), minus: dec!(0.9) },
            Some(("VI Bullish Crossover", dec!(1))),
        ),
        case(
            "minus vi above plus",
            IndicatorKind::Vortex,
            IndicatorValue::Vortex { plus: dec!(0.9), minus: dec!(1.1) },
            Some(("VI Bearish Crossover", dec!(-1))),
        ),
        case(
            "balanced vortex",
            IndicatorKind::Vortex,
            IndicatorValue::Vortex { plus: dec!(0.5), minus: dec!(0.5) },
            None,
        ),
    ]);
}

#[test]
fn test_volume_confirmation_rule() {
    let kind = IndicatorKind::VolumeConfirmation;
    let confirmed = |confirmed| IndicatorValue::VolumeConfirmation {
        confirmed,
        volume: dec!(3000),
        average: dec!(1000),
    };
    run(vec![
        case("confirmed", kind, confirmed(true), Some(("Volume Confirmation", dec!(1)))),
        case("not confirmed", kind, confirmed(false), None),
    ]);
}

#[test]
fn test_divergence_rule() {
    let kind = IndicatorKind::Divergence;
    let divergence = |bias| IndicatorValue::Divergence { bias };
    run(vec![
        case("bullish", kind, divergence(Bias::Bullish), Some(("Bullish Divergence", dec!(1)))),
        case("bearish", kind, divergence(Bias::Bearish), Some(("Bearish Divergence", dec!(-1)))),
        case("none", kind, divergence(Bias::Neutral), None),
    ]);
}

#[test]
fn test_contribution_scales_with_weight() {
    let config = AnalyzerConfig::default();
    let outcome = evaluate_rule(IndicatorKind::Rsi, &IndicatorValue::scalar(dec!(80)), PRICE, &config);
    assert_eq!(
        outcome,
        RuleOutcome::Bearish {
            condition: "RSI Overbought",
            share: Decimal::ONE
        }
    );
    assert_eq!(outcome.contribution(dec!(0.3)), Some(("RSI Overbought", dec!(-0.3))));
}

#[test]
fn test_mismatched_value_is_neutral() {
    let config = AnalyzerConfig::default();
    let outcome = evaluate_rule(IndicatorKind::Rsi, &stoch(dec!(5), dec!(1)), PRICE, &config);
    assert_eq!(outcome, RuleOutcome::Neutral);
}
