//! Indicator registry: the closed set of indicator kinds, their typed
//! parameters, and dispatch to the library functions.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::config::AnalyzerConfig;
use crate::indicators::error::IndicatorError;
use crate::indicators::momentum::{
    calculate_awesome_oscillator, calculate_cci, calculate_macd, calculate_momentum,
    calculate_rsi, calculate_stoch_rsi, calculate_stochastic, calculate_williams_r,
    detect_macd_divergence, StochasticSeries, DIVERGENCE_MIN_BARS,
};
use crate::indicators::trend::{calculate_adx, calculate_ema_alignment, calculate_psar, calculate_sma};
use crate::indicators::volatility::{calculate_bollinger_bands, calculate_vortex};
use crate::indicators::volume::{calculate_adi, calculate_cmf, calculate_fve, calculate_mfi, calculate_obv, calculate_vwap};
use crate::models::candle::CandleWindow;
use crate::models::indicators::{IndicatorValue, IndicatorValues};
use crate::series::NumericSeries;

/// Indicator category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorCategory {
    Momentum,
    Trend,
    Volatility,
    Volume,
}

/// Every indicator the scorer knows. Declaration order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    #[serde(rename = "ema_alignment")]
    EmaAlignment,
    #[serde(rename = "momentum")]
    Momentum,
    #[serde(rename = "volume_confirmation")]
    VolumeConfirmation,
    #[serde(rename = "divergence")]
    Divergence,
    #[serde(rename = "stoch_rsi")]
    StochRsi,
    #[serde(rename = "rsi")]
    Rsi,
    #[serde(rename = "macd")]
    Macd,
    #[serde(rename = "vwap")]
    Vwap,
    #[serde(rename = "obv")]
    Obv,
    #[serde(rename = "adi")]
    Adi,
    #[serde(rename = "cci")]
    Cci,
    #[serde(rename = "wr")]
    WilliamsR,
    #[serde(rename = "adx")]
    Adx,
    #[serde(rename = "psar")]
    Psar,
    #[serde(rename = "fve")]
    Fve,
    #[serde(rename = "sma_10")]
    Sma10,
    #[serde(rename = "mfi")]
    Mfi,
    #[serde(rename = "stochastic_oscillator")]
    StochasticOscillator,
    #[serde(rename = "cmf")]
    Cmf,
    #[serde(rename = "ao")]
    AwesomeOscillator,
    #[serde(rename = "vi")]
    Vortex,
    #[serde(rename = "bb")]
    BollingerBands,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 22] = [
        IndicatorKind::EmaAlignment,
        IndicatorKind::Momentum,
        IndicatorKind::VolumeConfirmation,
        IndicatorKind::Divergence,
        IndicatorKind::StochRsi,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::Vwap,
        IndicatorKind::Obv,
        IndicatorKind::Adi,
        IndicatorKind::Cci,
        IndicatorKind::WilliamsR,
        IndicatorKind::Adx,
        IndicatorKind::Psar,
        IndicatorKind::Fve,
        IndicatorKind::Sma10,
        IndicatorKind::Mfi,
        IndicatorKind::StochasticOscillator,
        IndicatorKind::Cmf,
        IndicatorKind::AwesomeOscillator,
        IndicatorKind::Vortex,
        IndicatorKind::BollingerBands,
    ];

    /// Configuration key of the indicator.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::EmaAlignment => "ema_alignment",
            IndicatorKind::Momentum => "momentum",
            IndicatorKind::VolumeConfirmation => "volume_confirmation",
            IndicatorKind::Divergence => "divergence",
            IndicatorKind::StochRsi => "stoch_rsi",
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Macd => "macd",
            IndicatorKind::Vwap => "vwap",
            IndicatorKind::Obv => "obv",
            IndicatorKind::Adi => "adi",
            IndicatorKind::Cci => "cci",
            IndicatorKind::WilliamsR => "wr",
            IndicatorKind::Adx => "adx",
            IndicatorKind::Psar => "psar",
            IndicatorKind::Fve => "fve",
            IndicatorKind::Sma10 => "sma_10",
            IndicatorKind::Mfi => "mfi",
            IndicatorKind::StochasticOscillator => "stochastic_oscillator",
            IndicatorKind::Cmf => "cmf",
            IndicatorKind::AwesomeOscillator => "ao",
            IndicatorKind::Vortex => "vi",
            IndicatorKind::BollingerBands => "bb",
        }
    }

    pub fn category(&self) -> IndicatorCategory {
        match self {
            IndicatorKind::Momentum
            | IndicatorKind::Divergence
            | IndicatorKind::StochRsi
            | IndicatorKind::Rsi
            | IndicatorKind::Macd
            | IndicatorKind::Cci
            | IndicatorKind::WilliamsR
            | IndicatorKind::StochasticOscillator
            | IndicatorKind::AwesomeOscillator => IndicatorCategory::Momentum,
            IndicatorKind::EmaAlignment
            | IndicatorKind::Adx
            | IndicatorKind::Psar
            | IndicatorKind::Sma10 => IndicatorCategory::Trend,
            IndicatorKind::Vortex | IndicatorKind::BollingerBands => IndicatorCategory::Volatility,
            IndicatorKind::VolumeConfirmation
            | IndicatorKind::Vwap
            | IndicatorKind::Obv
            | IndicatorKind::Adi
            | IndicatorKind::Fve
            | IndicatorKind::Mfi
            | IndicatorKind::Cmf => IndicatorCategory::Volume,
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorKind {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndicatorKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| IndicatorError::UnknownIndicator(s.to_string()))
    }
}

/// Typed parameters for one indicator, resolved once from configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorParams {
    EmaAlignment { short: usize, long: usize },
    Momentum { period: usize },
    VolumeConfirmation { window: usize, multiplier: Decimal },
    Divergence { fast: usize, slow: usize, signal: usize, lookback: usize },
    StochRsi { rsi_period: usize, k_period: usize, d_period: usize },
    Rsi { window: usize },
    Macd { fast: usize, slow: usize, signal: usize },
    Vwap { window: usize },
    Obv,
    Adi,
    Cci { window: usize, constant: Decimal },
    WilliamsR { window: usize },
    Adx { window: usize },
    Psar { acceleration: Decimal, max_acceleration: Decimal },
    Fve { window: usize },
    Sma { window: usize },
    Mfi { window: usize },
    Stochastic { k_period: usize, d_period: usize },
    Cmf { window: usize },
    AwesomeOscillator { short: usize, long: usize },
    Vortex { window: usize },
    Bollinger { window: usize, std_mult: Decimal },
}

/// Column series of a candle window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub open: NumericSeries,
    pub high: NumericSeries,
    pub low: NumericSeries,
    pub close: NumericSeries,
    pub volume: NumericSeries,
}

impl PriceSeries {
    pub fn from_window(window: &CandleWindow) -> Self {
        Self {
            open: window.opens(),
            high: window.highs(),
            low: window.lows(),
            close: window.closes(),
            volume: window.volumes(),
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

fn period(value: u32) -> usize {
    value as usize
}

impl IndicatorParams {
    pub fn from_config(kind: IndicatorKind, config: &AnalyzerConfig) -> Self {
        let p = &config.indicator_periods;
        match kind {
            IndicatorKind::EmaAlignment => IndicatorParams::EmaAlignment {
                short: period(config.ema_short_period),
                long: period(config.ema_long_period),
            },
            IndicatorKind::Momentum => IndicatorParams::Momentum { period: period(p.momentum) },
            IndicatorKind::VolumeConfirmation => IndicatorParams::VolumeConfirmation {
                window: period(p.volume_ma),
                multiplier: config.volume_confirmation_multiplier,
            },
            IndicatorKind::Divergence => IndicatorParams::Divergence {
                fast: period(config.macd_fast),
                slow: period(config.macd_slow),
                signal: period(config.macd_signal),
                lookback: period(config.divergence_lookback),
            },
            IndicatorKind::StochRsi => IndicatorParams::StochRsi {
                rsi_period: period(p.stoch_rsi_period),
                k_period: period(p.stoch_rsi_k_period),
                d_period: period(p.stoch_rsi_d_period),
            },
            IndicatorKind::Rsi => IndicatorParams::Rsi { window: period(p.rsi) },
            IndicatorKind::Macd => IndicatorParams::Macd {
                fast: period(config.macd_fast),
                slow: period(config.macd_slow),
                signal: period(config.macd_signal),
            },
            IndicatorKind::Vwap => IndicatorParams::Vwap { window: period(p.vwap) },
            IndicatorKind::Obv => IndicatorParams::Obv,
            IndicatorKind::Adi => IndicatorParams::Adi,
            IndicatorKind::Cci => IndicatorParams::Cci {
                window: period(p.cci),
                constant: config.cci_constant,
            },
            IndicatorKind::WilliamsR => IndicatorParams::WilliamsR { window: period(p.williams_r) },
            IndicatorKind::Adx => IndicatorParams::Adx { window: period(p.adx) },
            IndicatorKind::Psar => IndicatorParams::Psar {
                acceleration: config.psar_acceleration,
                max_acceleration: config.psar_max_acceleration,
            },
            IndicatorKind::Fve => IndicatorParams::Fve { window: period(p.fve_price_ema) },
            IndicatorKind::Sma10 => IndicatorParams::Sma { window: period(p.sma_10) },
            IndicatorKind::Mfi => IndicatorParams::Mfi { window: period(p.mfi) },
            IndicatorKind::StochasticOscillator => IndicatorParams::Stochastic {
                k_period: period(p.stoch_osc_k),
                d_period: period(p.stoch_osc_d),
            },
            IndicatorKind::Cmf => IndicatorParams::Cmf { window: period(p.cmf) },
            IndicatorKind::AwesomeOscillator => IndicatorParams::AwesomeOscillator {
                short: period(p.ao_short),
                long: period(p.ao_long),
            },
            IndicatorKind::Vortex => IndicatorParams::Vortex { window: period(p.vi) },
            IndicatorKind::BollingerBands => IndicatorParams::Bollinger {
                window: period(p.bb),
                std_mult: config.bb_std_multiplier,
            },
        }
    }

    pub fn kind(&self) -> IndicatorKind {
        match self {
            IndicatorParams::EmaAlignment { .. } => IndicatorKind::EmaAlignment,
            IndicatorParams::Momentum { .. } => IndicatorKind::Momentum,
            IndicatorParams::VolumeConfirmation { .. } => IndicatorKind::VolumeConfirmation,
            IndicatorParams::Divergence { .. } => IndicatorKind::Divergence,
            IndicatorParams::StochRsi { .. } => IndicatorKind::StochRsi,
            IndicatorParams::Rsi { .. } => IndicatorKind::Rsi,
            IndicatorParams::Macd { .. } => IndicatorKind::Macd,
            IndicatorParams::Vwap { .. } => IndicatorKind::Vwap,
            IndicatorParams::Obv => IndicatorKind::Obv,
            IndicatorParams::Adi => IndicatorKind::Adi,
            IndicatorParams::Cci { .. } => IndicatorKind::Cci,
            IndicatorParams::WilliamsR { .. } => IndicatorKind::WilliamsR,
            IndicatorParams::Adx { .. } => IndicatorKind::Adx,
            IndicatorParams::Psar { .. } => IndicatorKind::Psar,
            IndicatorParams::Fve { .. } => IndicatorKind::Fve,
            IndicatorParams::Sma { .. } => IndicatorKind::Sma10,
            IndicatorParams::Mfi { .. } => IndicatorKind::Mfi,
            IndicatorParams::Stochastic { .. } => IndicatorKind::StochasticOscillator,
            IndicatorParams::Cmf { .. } => IndicatorKind::Cmf,
            IndicatorParams::AwesomeOscillator { .. } => IndicatorKind::AwesomeOscillator,
            IndicatorParams::Vortex { .. } => IndicatorKind::Vortex,
            IndicatorParams::Bollinger { .. } => IndicatorKind::BollingerBands,
        }
    }

    /// Bars needed before the indicator's latest value is meaningful.
    pub fn lookback(&self) -> usize {
        match *self {
            IndicatorParams::EmaAlignment { long, .. } => long.max(2),
            IndicatorParams::Momentum { period } => period + 1,
            IndicatorParams::VolumeConfirmation { window, .. } => window,
            IndicatorParams::Divergence { slow, signal, .. } => DIVERGENCE_MIN_BARS.max(slow + signal),
            IndicatorParams::StochRsi { rsi_period, k_period, d_period } => rsi_period + k_period + d_period,
            IndicatorParams::Rsi { window } => window + 1,
            IndicatorParams::Macd { slow, signal, .. } => slow + signal,
            IndicatorParams::Vwap { window } => window,
            IndicatorParams::Obv | IndicatorParams::Adi => 1,
            IndicatorParams::Cci { window, .. } => window,
            IndicatorParams::WilliamsR { window } => window,
            IndicatorParams::Adx { window } => 2 * window,
            IndicatorParams::Psar { .. } => 2,
            IndicatorParams::Fve { window } => window,
            IndicatorParams::Sma { window } => window,
            IndicatorParams::Mfi { window } => window + 1,
            IndicatorParams::Stochastic { k_period, d_period } => k_period + d_period,
            IndicatorParams::Cmf { window } => window,
            IndicatorParams::AwesomeOscillator { long, .. } => long + 1,
            IndicatorParams::Vortex { window } => window + 1,
            IndicatorParams::Bollinger { window, .. } => window,
        }
    }

    pub fn validate(&self) -> Result<(), IndicatorError> {
        let kind = self.kind().as_str();
        let positive = |name: &'static str, value: usize| {
            if value == 0 {
                Err(IndicatorError::InvalidParameter {
                    indicator: kind,
                    name,
                    value: value.to_string(),
                })
            } else {
                Ok(())
            }
        };
        let non_negative = |name: &'static str, value: Decimal| {
            if value.is_sign_negative() {
                Err(IndicatorError::InvalidParameter {
                    indicator: kind,
                    name,
                    value: value.to_string(),
                })
            } else {
                Ok(())
            }
        };
        match *self {
            IndicatorParams::EmaAlignment { short, long } => {
                positive("short", short)?;
                positive("long", long)
            }
            IndicatorParams::Momentum { period } => positive("period", period),
            IndicatorParams::VolumeConfirmation { window, multiplier } => {
                positive("window", window)?;
                non_negative("multiplier", multiplier)
            }
            IndicatorParams::Divergence { fast, slow, signal, lookback } => {
                positive("fast", fast)?;
                positive("slow", slow)?;
                positive("signal", signal)?;
                positive("lookback", lookback)
            }
            IndicatorParams::StochRsi { rsi_period, k_period, d_period } => {
                positive("rsi_period", rsi_period)?;
                positive("k_period", k_period)?;
                positive("d_period", d_period)
            }
            IndicatorParams::Rsi { window }
            | IndicatorParams::Vwap { window }
            | IndicatorParams::WilliamsR { window }
            | IndicatorParams::Adx { window }
            | IndicatorParams::Fve { window }
            | IndicatorParams::Sma { window }
            | IndicatorParams::Mfi { window }
            | IndicatorParams::Cmf { window }
            | IndicatorParams::Vortex { window } => positive("window", window),
            IndicatorParams::Macd { fast, slow, signal } => {
                positive("fast", fast)?;
                positive("slow", slow)?;
                positive("signal", signal)
            }
            IndicatorParams::Obv | IndicatorParams::Adi => Ok(()),
            IndicatorParams::Cci { window, constant } => {
                positive("window", window)?;
                if constant.is_zero() {
                    return Err(IndicatorError::InvalidParameter {
                        indicator: kind,
                        name: "constant",
                        value: constant.to_string(),
                    });
                }
                Ok(())
            }
            IndicatorParams::Psar { acceleration, max_acceleration } => {
                non_negative("acceleration", acceleration)?;
                non_negative("max_acceleration", max_acceleration)
            }
            IndicatorParams::Stochastic { k_period, d_period } => {
                positive("k_period", k_period)?;
                positive("d_period", d_period)
            }
            IndicatorParams::AwesomeOscillator { short, long } => {
                positive("short", short)?;
                positive("long", long)
            }
            IndicatorParams::Bollinger { window, std_mult } => {
                positive("window", window)?;
                non_negative("std_mult", std_mult)
            }
        }
    }

    /// Latest value of the indicator. `Ok(None)` when the window is too short
    /// to produce one.
    pub fn compute(&self, prices: &PriceSeries) -> Result<Option<IndicatorValue>, IndicatorError> {
        self.validate()?;
        if prices.is_empty() {
            return Ok(None);
        }
        let PriceSeries { high, low, close, volume, .. } = prices;
        let scalar = |series: NumericSeries| series.last().map(IndicatorValue::scalar);
        let stochastic = |s: StochasticSeries| match (s.k.last(), s.d.last()) {
            (Some(k), Some(d)) => Some(IndicatorValue::Stochastic { k, d }),
            _ => None,
        };

        let value = match *self {
            IndicatorParams::EmaAlignment { short, long } => {
                calculate_ema_alignment(close, short, long).map(|score| IndicatorValue::EmaAlignment { score })
            }
            IndicatorParams::Momentum { period } => scalar(calculate_momentum(close, period)),
            IndicatorParams::VolumeConfirmation { window, multiplier } => {
                match (volume.last(), calculate_sma(volume, window).last()) {
                    (Some(latest), Some(average)) => Some(IndicatorValue::VolumeConfirmation {
                        confirmed: !average.is_zero() && latest > average * multiplier,
                        volume: latest,
                        average,
                    }),
                    _ => None,
                }
            }
            IndicatorParams::Divergence { fast, slow, signal, lookback } => {
                let macd = calculate_macd(close, fast, slow, signal);
                detect_macd_divergence(close, &macd.histogram, lookback)
                    .map(|bias| IndicatorValue::Divergence { bias })
            }
            IndicatorParams::StochRsi { rsi_period, k_period, d_period } => {
                stochastic(calculate_stoch_rsi(close, rsi_period, k_period, d_period))
            }
            IndicatorParams::Rsi { window } => scalar(calculate_rsi(close, window)),
            IndicatorParams::Macd { fast, slow, signal } => {
                let macd = calculate_macd(close, fast, slow, signal);
                match (macd.macd.last(), macd.signal.last(), macd.histogram.last()) {
                    (Some(m), Some(s), Some(h)) => Some(IndicatorValue::Macd {
                        macd: m,
                        signal: s,
                        histogram: h,
                    }),
                    _ => None,
                }
            }
            IndicatorParams::Vwap { window } => scalar(calculate_vwap(close, volume, window)),
            IndicatorParams::Obv => scalar(calculate_obv(close, volume)),
            IndicatorParams::Adi => scalar(calculate_adi(high, low, close, volume)),
            IndicatorParams::Cci { window, constant } => scalar(calculate_cci(high, low, close, window, constant)),
            IndicatorParams::WilliamsR { window } => scalar(calculate_williams_r(high, low, close, window)),
            IndicatorParams::Adx { window } => {
                let adx = calculate_adx(high, low, close, window);
                match (adx.adx.last(), adx.plus_di.last(), adx.minus_di.last()) {
                    (Some(a), Some(p), Some(m)) => Some(IndicatorValue::Adx {
                        adx: a,
                        plus_di: p,
                        minus_di: m,
                    }),
                    _ => None,
                }
            }
            IndicatorParams::Psar { acceleration, max_acceleration } => {
                scalar(calculate_psar(high, low, close, acceleration, max_acceleration))
            }
            IndicatorParams::Fve { window } => scalar(calculate_fve(close, volume, window)),
            IndicatorParams::Sma { window } => scalar(calculate_sma(close, window)),
            IndicatorParams::Mfi { window } => scalar(calculate_mfi(high, low, close, volume, window)),
            IndicatorParams::Stochastic { k_period, d_period } => {
                stochastic(calculate_stochastic(high, low, close, k_period, d_period))
            }
            IndicatorParams::Cmf { window } => scalar(calculate_cmf(high, low, close, volume, window)),
            IndicatorParams::AwesomeOscillator { short, long } => {
                scalar(calculate_awesome_oscillator(close, short, long))
            }
            IndicatorParams::Vortex { window } => {
                let vi = calculate_vortex(high, low, close, window);
                match (vi.plus.last(), vi.minus.last()) {
                    (Some(plus), Some(minus)) => Some(IndicatorValue::Vortex { plus, minus }),
                    _ => None,
                }
            }
            IndicatorParams::Bollinger { window, std_mult } => {
                let bands = calculate_bollinger_bands(close, window, std_mult);
                match (bands.upper.last(), bands.middle.last(), bands.lower.last()) {
                    (Some(upper), Some(middle), Some(lower)) => Some(IndicatorValue::Bands { upper, middle, lower }),
                    _ => None,
                }
            }
        };
        Ok(value)
    }
}

/// Indicators enabled for a configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRegistry {
    entries: Vec<IndicatorParams>,
}

impl IndicatorRegistry {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        let entries = IndicatorKind::ALL
            .iter()
            .filter(|kind| config.is_enabled(**kind))
            .map(|kind| IndicatorParams::from_config(*kind, config))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[IndicatorParams] {
        &self.entries
    }

    pub fn kinds(&self) -> impl Iterator<Item = IndicatorKind> + '_ {
        self.entries.iter().map(IndicatorParams::kind)
    }

    /// Longest lookback of the enabled indicators.
    pub fn max_lookback(&self) -> usize {
        self.entries.iter().map(IndicatorParams::lookback).max().unwrap_or(0)
    }

    /// Minimum bars before a signal is trusted:
    /// `max(floor, longest lookback) + buffer`.
    pub fn min_bars_required(&self, floor: usize, buffer: usize) -> usize {
        floor.max(self.max_lookback()) + buffer
    }

    /// Compute every enabled indicator. A failure is logged and recorded as
    /// `None` without affecting the others.
    pub fn compute_all(&self, prices: &PriceSeries) -> IndicatorValues {
        let mut values = IndicatorValues::new();
        for params in &self.entries {
            let kind = params.kind();
            let value = match params.compute(prices) {
                Ok(value) => value,
                Err(e) => {
                    error!(indicator = %kind, error = %e, "indicator computation failed");
                    None
                }
            };
            values.insert(kind, value);
        }
        values
    }
}
