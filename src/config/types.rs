use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::indicators::registry::IndicatorKind;
use crate::models::candle::DuplicatePolicy;

pub const VALID_INTERVALS: [&str; 11] = ["1", "3", "5", "15", "30", "60", "120", "240", "D", "W", "M"];
pub const DEFAULT_INTERVAL: &str = "15";

pub const LOW_VOLATILITY: &str = "low_volatility";
pub const HIGH_VOLATILITY: &str = "high_volatility";

// ---------------------------------------------------------------------------
// Top-level analyzer config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub interval: String,
    /// Seconds between analysis cycles, honoured by the caller's loop.
    pub analysis_interval: u64,
    pub max_candles: usize,
    pub min_bars_floor: usize,
    pub min_bars_buffer: usize,
    pub duplicate_policy: DuplicatePolicy,

    pub ema_short_period: u32,
    pub ema_long_period: u32,
    pub macd_fast: u32,
    pub macd_slow: u32,
    pub macd_signal: u32,
    pub divergence_lookback: u32,

    pub signal_score_threshold: Decimal,
    pub stop_loss_multiple: Decimal,
    pub take_profit_multiple: Decimal,
    pub atr_change_threshold: Decimal,
    pub volume_confirmation_multiplier: Decimal,
    pub rsi_oversold: Decimal,
    pub rsi_overbought: Decimal,
    pub stoch_rsi_oversold_threshold: Decimal,
    pub stoch_rsi_overbought_threshold: Decimal,
    pub stoch_osc_oversold: Decimal,
    pub stoch_osc_overbought: Decimal,
    pub psar_acceleration: Decimal,
    pub psar_max_acceleration: Decimal,
    pub bb_std_multiplier: Decimal,
    pub cci_constant: Decimal,
    pub num_levels: usize,
    /// Score a fresh EMA crossover at half the alignment weight.
    pub ema_crossover_partial_weight: bool,

    pub order_book_enabled: bool,
    pub order_book_depth_to_check: usize,
    pub order_book_wall_threshold_multiplier: Decimal,
    pub order_book_support_confidence_boost: Decimal,
    pub order_book_resistance_confidence_boost: Decimal,

    pub indicators: IndicatorFlags,
    pub weight_sets: BTreeMap<String, WeightSet>,
    pub indicator_periods: IndicatorPeriods,
    pub trend_filter: TrendFilterConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        let mut weight_sets = BTreeMap::new();
        weight_sets.insert(LOW_VOLATILITY.to_string(), WeightSet::low_volatility());
        weight_sets.insert(HIGH_VOLATILITY.to_string(), WeightSet::high_volatility());

        Self {
            interval: DEFAULT_INTERVAL.to_string(),
            analysis_interval: 30,
            max_candles: 200,
            min_bars_floor: 30,
            min_bars_buffer: 10,
            duplicate_policy: DuplicatePolicy::Overwrite,
            ema_short_period: 12,
            ema_long_period: 26,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            divergence_lookback: 5,
            signal_score_threshold: dec!(1.0),
            stop_loss_multiple: dec!(1.5),
            take_profit_multiple: dec!(1.0),
            atr_change_threshold: dec!(0.005),
            volume_confirmation_multiplier: dec!(1.5),
            rsi_oversold: dec!(30),
            rsi_overbought: dec!(70),
            stoch_rsi_oversold_threshold: dec!(20),
            stoch_rsi_overbought_threshold: dec!(80),
            stoch_osc_oversold: dec!(20),
            stoch_osc_overbought: dec!(80),
            psar_acceleration: dec!(0.02),
            psar_max_acceleration: dec!(0.2),
            bb_std_multiplier: dec!(2),
            cci_constant: dec!(0.015),
            num_levels: 5,
            ema_crossover_partial_weight: true,
            order_book_enabled: true,
            order_book_depth_to_check: 10,
            order_book_wall_threshold_multiplier: dec!(2.0),
            order_book_support_confidence_boost: dec!(3),
            order_book_resistance_confidence_boost: dec!(3),
            indicators: IndicatorFlags::default(),
            weight_sets,
            indicator_periods: IndicatorPeriods::default(),
            trend_filter: TrendFilterConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn is_enabled(&self, kind: IndicatorKind) -> bool {
        self.indicators.is_enabled(kind)
    }

    pub fn weight_set(&self, name: &str) -> Option<&WeightSet> {
        self.weight_sets.get(name)
    }
}

// ---------------------------------------------------------------------------
// Indicator flags and weights
// ---------------------------------------------------------------------------

/// Enabled flag per indicator. Unknown names are dropped on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, bool>", into = "BTreeMap<String, bool>")]
pub struct IndicatorFlags(BTreeMap<IndicatorKind, bool>);

impl IndicatorFlags {
    pub fn is_enabled(&self, kind: IndicatorKind) -> bool {
        self.0.get(&kind).copied().unwrap_or(false)
    }

    pub fn set(&mut self, kind: IndicatorKind, enabled: bool) {
        self.0.insert(kind, enabled);
    }

    pub fn enabled(&self) -> impl Iterator<Item = IndicatorKind> + '_ {
        self.0.iter().filter(|(_, on)| **on).map(|(k, _)| *k)
    }
}

impl Default for IndicatorFlags {
    fn default() -> Self {
        IndicatorFlags(IndicatorKind::ALL.iter().map(|k| (*k, true)).collect())
    }
}

impl From<BTreeMap<String, bool>> for IndicatorFlags {
    fn from(raw: BTreeMap<String, bool>) -> Self {
        IndicatorFlags(keyed_by_kind(raw, "indicators"))
    }
}

impl From<IndicatorFlags> for BTreeMap<String, bool> {
    fn from(flags: IndicatorFlags) -> Self {
        flags.0.into_iter().map(|(k, v)| (k.as_str().to_string(), v)).collect()
    }
}

/// Per-indicator weights for one volatility regime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Decimal>", into = "BTreeMap<String, Decimal>")]
pub struct WeightSet(BTreeMap<IndicatorKind, Decimal>);

impl WeightSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: IndicatorKind, weight: Decimal) -> Self {
        self.0.insert(kind, weight);
        self
    }

    pub fn get(&self, kind: IndicatorKind) -> Option<Decimal> {
        self.0.get(&kind).copied()
    }

    /// Weights in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (IndicatorKind, Decimal)> + '_ {
        self.0.iter().map(|(k, w)| (*k, *w))
    }

    pub fn total(&self) -> Decimal {
        self.0.values().copied().sum()
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(IndicatorKind, Decimal) -> bool,
    {
        self.0.retain(|k, w| keep(*k, *w));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn low_volatility() -> Self {
        use IndicatorKind::*;
        Self::from_pairs(&[
            (EmaAlignment, dec!(0.3)),
            (Momentum, dec!(0.2)),
            (VolumeConfirmation, dec!(0.2)),
            (Divergence, dec!(0.1)),
            (StochRsi, dec!(0.5)),
            (Rsi, dec!(0.3)),
            (Macd, dec!(0.3)),
            (Vwap, dec!(0.2)),
            (Obv, dec!(0.1)),
            (Adi, dec!(0.1)),
            (Cci, dec!(0.1)),
            (WilliamsR, dec!(0.1)),
            (Adx, dec!(0.1)),
            (Psar, dec!(0.1)),
            (Fve, dec!(0.2)),
            (Sma10, dec!(0.0)),
            (Mfi, dec!(0.3)),
            (StochasticOscillator, dec!(0.4)),
            (Cmf, dec!(0.2)),
            (AwesomeOscillator, dec!(0.3)),
            (Vortex, dec!(0.2)),
            (BollingerBands, dec!(0.4)),
        ])
    }

    pub fn high_volatility() -> Self {
        use IndicatorKind::*;
        Self::from_pairs(&[
            (EmaAlignment, dec!(0.1)),
            (Momentum, dec!(0.4)),
            (VolumeConfirmation, dec!(0.1)),
            (Divergence, dec!(0.2)),
            (StochRsi, dec!(0.4)),
            (Rsi, dec!(0.4)),
            (Macd, dec!(0.4)),
            (Vwap, dec!(0.1)),
            (Obv, dec!(0.1)),
            (Adi, dec!(0.1)),
            (Cci, dec!(0.1)),
            (WilliamsR, dec!(0.1)),
            (Adx, dec!(0.1)),
            (Psar, dec!(0.1)),
            (Fve, dec!(0.3)),
            (Sma10, dec!(0.0)),
            (Mfi, dec!(0.4)),
            (StochasticOscillator, dec!(0.3)),
            (Cmf, dec!(0.3)),
            (AwesomeOscillator, dec!(0.5)),
            (Vortex, dec!(0.4)),
            (BollingerBands, dec!(0.1)),
        ])
    }

    fn from_pairs(pairs: &[(IndicatorKind, Decimal)]) -> Self {
        WeightSet(pairs.iter().copied().collect())
    }
}

impl From<BTreeMap<String, Decimal>> for WeightSet {
    fn from(raw: BTreeMap<String, Decimal>) -> Self {
        WeightSet(keyed_by_kind(raw, "weight_sets"))
    }
}

impl From<WeightSet> for BTreeMap<String, Decimal> {
    fn from(set: WeightSet) -> Self {
        set.0.into_iter().map(|(k, v)| (k.as_str().to_string(), v)).collect()
    }
}

fn keyed_by_kind<V>(raw: BTreeMap<String, V>, section: &str) -> BTreeMap<IndicatorKind, V> {
    raw.into_iter()
        .filter_map(|(name, value)| match name.parse::<IndicatorKind>() {
            Ok(kind) => Some((kind, value)),
            Err(_) => {
                warn!(section, indicator = %name, "unknown indicator name ignored");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorPeriods {
    pub rsi: u32,
    pub mfi: u32,
    pub cci: u32,
    pub williams_r: u32,
    pub adx: u32,
    pub stoch_rsi_period: u32,
    pub stoch_rsi_k_period: u32,
    pub stoch_rsi_d_period: u32,
    pub momentum: u32,
    pub volume_ma: u32,
    pub atr: u32,
    pub sma_10: u32,
    pub fve_price_ema: u32,
    pub stoch_osc_k: u32,
    pub stoch_osc_d: u32,
    pub vwap: u32,
    pub cmf: u32,
    pub ao_short: u32,
    pub ao_long: u32,
    pub vi: u32,
    pub bb: u32,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            rsi: 14,
            mfi: 14,
            cci: 20,
            williams_r: 14,
            adx: 14,
            stoch_rsi_period: 14,
            stoch_rsi_k_period: 3,
            stoch_rsi_d_period: 3,
            momentum: 10,
            volume_ma: 20,
            atr: 14,
            sma_10: 10,
            fve_price_ema: 10,
            stoch_osc_k: 14,
            stoch_osc_d: 3,
            vwap: 14,
            cmf: 20,
            ao_short: 5,
            ao_long: 34,
            vi: 14,
            bb: 20,
        }
    }
}

impl IndicatorPeriods {
    /// Field name and value for every period, used by validation.
    pub fn entries_mut(&mut self) -> [(&'static str, &mut u32); 21] {
        [
            ("rsi", &mut self.rsi),
            ("mfi", &mut self.mfi),
            ("cci", &mut self.cci),
            ("williams_r", &mut self.williams_r),
            ("adx", &mut self.adx),
            ("stoch_rsi_period", &mut self.stoch_rsi_period),
            ("stoch_rsi_k_period", &mut self.stoch_rsi_k_period),
            ("stoch_rsi_d_period", &mut self.stoch_rsi_d_period),
            ("momentum", &mut self.momentum),
            ("volume_ma", &mut self.volume_ma),
            ("atr", &mut self.atr),
            ("sma_10", &mut self.sma_10),
            ("fve_price_ema", &mut self.fve_price_ema),
            ("stoch_osc_k", &mut self.stoch_osc_k),
            ("stoch_osc_d", &mut self.stoch_osc_d),
            ("vwap", &mut self.vwap),
            ("cmf", &mut self.cmf),
            ("ao_short", &mut self.ao_short),
            ("ao_long", &mut self.ao_long),
            ("vi", &mut self.vi),
            ("bb", &mut self.bb),
        ]
    }
}

// ---------------------------------------------------------------------------
// Incremental trend filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendFilterConfig {
    pub smoother_period: u32,
    pub roc_period: u32,
    pub mom_ema_period: u32,
    pub volume_spike_window: u32,
    pub volume_spike_multiplier: Decimal,
    pub chandelier_period: u32,
    pub chandelier_multiplier: Decimal,
    pub base_adx_threshold: Decimal,
    pub adx_volatility_multiplier: Decimal,
}

impl Default for TrendFilterConfig {
    fn default() -> Self {
        Self {
            smoother_period: 10,
            roc_period: 10,
            mom_ema_period: 5,
            volume_spike_window: 20,
            volume_spike_multiplier: dec!(2.0),
            chandelier_period: 22,
            chandelier_multiplier: dec!(3.0),
            base_adx_threshold: dec!(20),
            adx_volatility_multiplier: dec!(10),
        }
    }
}
