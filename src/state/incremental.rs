//! Incremental indicator engine.
//!
//! `initialize_from_history` runs the full-history indicator functions once
//! and seeds every kernel from their final values; `advance` then steps the
//! same kernels one bar at a time. Both paths share the kernels in this
//! module's siblings, so warm-up followed by N advances equals warm-up over
//! the whole history.

use std::collections::VecDeque;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{AnalyzerConfig, TrendFilterConfig};
use crate::indicators::error::IndicatorError;
use crate::indicators::momentum::{calculate_rate_of_change, gains_and_losses, rate_of_change, rsi_from_averages};
use crate::indicators::trend::{
    calculate_ema, calculate_psar_with_state, calculate_super_smoother_with_state, calculate_wilder,
    calculate_wilder_adx, directional_index, directional_movement,
};
use crate::indicators::volatility::true_range;
use crate::models::candle::Candle;
use crate::series::NumericSeries;
use crate::state::{EmaState, PsarState, SuperSmoother, WilderState};

const ADX_VOLATILITY_BASELINE: Decimal = dec!(0.001);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncrementalParams {
    pub atr_period: usize,
    pub adx_period: usize,
    pub rsi_period: usize,
    pub ema_short: usize,
    pub ema_long: usize,
    pub psar_acceleration: Decimal,
    pub psar_max_acceleration: Decimal,
    pub trend_filter: TrendFilterConfig,
}

impl IncrementalParams {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            atr_period: config.indicator_periods.atr as usize,
            adx_period: config.indicator_periods.adx as usize,
            rsi_period: config.indicator_periods.rsi as usize,
            ema_short: config.ema_short_period as usize,
            ema_long: config.ema_long_period as usize,
            psar_acceleration: config.psar_acceleration,
            psar_max_acceleration: config.psar_max_acceleration,
            trend_filter: config.trend_filter.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), IndicatorError> {
        let tf = &self.trend_filter;
        let periods: [(&'static str, usize); 10] = [
            ("atr_period", self.atr_period),
            ("adx_period", self.adx_period),
            ("rsi_period", self.rsi_period),
            ("ema_short", self.ema_short),
            ("ema_long", self.ema_long),
            ("smoother_period", tf.smoother_period as usize),
            ("roc_period", tf.roc_period as usize),
            ("mom_ema_period", tf.mom_ema_period as usize),
            ("volume_spike_window", tf.volume_spike_window as usize),
            ("chandelier_period", tf.chandelier_period as usize),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(IndicatorError::InvalidParameter {
                    indicator: "incremental_state",
                    name,
                    value: value.to_string(),
                });
            }
        }
        if self.psar_acceleration <= Decimal::ZERO || self.psar_acceleration > self.psar_max_acceleration {
            return Err(IndicatorError::InvalidParameter {
                indicator: "incremental_state",
                name: "psar_acceleration",
                value: self.psar_acceleration.to_string(),
            });
        }
        Ok(())
    }

    fn roc_period(&self) -> usize {
        self.trend_filter.roc_period as usize
    }

    fn volume_window(&self) -> usize {
        self.trend_filter.volume_spike_window as usize
    }

    fn chandelier_period(&self) -> usize {
        self.trend_filter.chandelier_period as usize
    }
}

impl Default for IncrementalParams {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

/// Read-only view of the incremental indicators after the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncrementalSnapshot {
    pub bars: usize,
    pub close: Decimal,
    pub atr: Decimal,
    pub adx: Decimal,
    pub plus_di: Decimal,
    pub minus_di: Decimal,
    pub rsi: Decimal,
    pub ema_short: Decimal,
    pub ema_long: Decimal,
    pub psar: Decimal,
    pub psar_uptrend: bool,
    pub super_smoother: Decimal,
    pub trend_up: bool,
    pub prev_trend_up: bool,
    pub roc: Decimal,
    pub mom_ema: Decimal,
    pub mom_cross_up: bool,
    pub mom_cross_down: bool,
    pub volume_spike: bool,
    pub chandelier_long: Option<Decimal>,
    pub chandelier_short: Option<Decimal>,
    pub dynamic_adx_ok: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncrementalIndicatorState {
    params: IncrementalParams,
    bars: usize,
    prev_high: Decimal,
    prev_low: Decimal,
    prev_close: Decimal,

    atr: WilderState,
    plus_dm: WilderState,
    minus_dm: WilderState,
    adx_tr: WilderState,
    adx: WilderState,
    avg_gain: WilderState,
    avg_loss: WilderState,
    ema_short: EmaState,
    ema_long: EmaState,
    psar: PsarState,
    smoother: SuperSmoother,
    trend_up: bool,
    prev_trend_up: bool,

    closes: VecDeque<Decimal>,
    roc: Decimal,
    prev_roc: Option<Decimal>,
    mom_ema: EmaState,
    prev_mom: Option<Decimal>,
    volumes: VecDeque<Decimal>,
    highs: VecDeque<Decimal>,
    lows: VecDeque<Decimal>,
}

fn last_of(series: &NumericSeries, name: &'static str) -> Result<Decimal, IndicatorError> {
    series.last().ok_or(IndicatorError::InsufficientData {
        indicator: name,
        required: 1,
        available: 0,
    })
}

fn tail(values: &[Decimal], keep: usize) -> VecDeque<Decimal> {
    values[values.len().saturating_sub(keep)..].iter().copied().collect()
}

fn push_bounded(buffer: &mut VecDeque<Decimal>, value: Decimal, cap: usize) {
    buffer.push_back(value);
    while buffer.len() > cap {
        buffer.pop_front();
    }
}

impl IncrementalIndicatorState {
    /// Warm up from a backlog of candles, oldest first.
    pub fn initialize_from_history(params: IncrementalParams, candles: &[Candle]) -> Result<Self, IndicatorError> {
        params.validate()?;
        let Some(last) = candles.last() else {
            return Err(IndicatorError::InsufficientData {
                indicator: "incremental_state",
                required: 1,
                available: 0,
            });
        };

        let highs: Vec<Decimal> = candles.iter().map(|c| c.high).collect();
        let lows: Vec<Decimal> = candles.iter().map(|c| c.low).collect();
        let closes: Vec<Decimal> = candles.iter().map(|c| c.close).collect();
        let volumes: Vec<Decimal> = candles.iter().map(|c| c.volume).collect();
        let high = NumericSeries::from_values(highs.iter().copied());
        let low = NumericSeries::from_values(lows.iter().copied());
        let close = NumericSeries::from_values(closes.iter().copied());

        let tr = true_range(&high, &low, &close);
        let atr = calculate_wilder(&tr, params.atr_period);

        let (plus_dm, minus_dm) = directional_movement(&high, &low);
        let adx = calculate_wilder_adx(&high, &low, &close, params.adx_period);

        let (gains, losses) = gains_and_losses(&close);

        let (_, psar) = calculate_psar_with_state(&high, &low, &close, params.psar_acceleration, params.psar_max_acceleration);
        let psar = psar.ok_or(IndicatorError::InsufficientData {
            indicator: "psar",
            required: 1,
            available: 0,
        })?;

        let smoother_period = params.trend_filter.smoother_period as usize;
        let (filtered, smoother) = calculate_super_smoother_with_state(&close, smoother_period);
        let smoother = smoother.ok_or_else(|| IndicatorError::InvalidParameter {
            indicator: "super_smoother",
            name: "smoother_period",
            value: smoother_period.to_string(),
        })?;
        let above_filter = |i: usize| match (close.get(i), filtered.get(i)) {
            (Some(c), Some(f)) => c > f,
            _ => false,
        };
        let n = candles.len();
        let trend_up = above_filter(n - 1);
        let prev_trend_up = n >= 2 && above_filter(n - 2);

        let mom_period = params.trend_filter.mom_ema_period as usize;
        let roc = calculate_rate_of_change(&close, params.roc_period());
        let mom = calculate_ema(&roc, mom_period);

        let ema_short = last_of(&calculate_ema(&close, params.ema_short), "ema_short")?;
        let ema_long = last_of(&calculate_ema(&close, params.ema_long), "ema_long")?;

        Ok(Self {
            bars: n,
            prev_high: last.high,
            prev_low: last.low,
            prev_close: last.close,

            atr: WilderState::seeded(params.atr_period, last_of(&atr, "atr")?),
            plus_dm: WilderState::seeded(params.adx_period, last_of(&calculate_wilder(&plus_dm, params.adx_period), "adx")?),
            minus_dm: WilderState::seeded(params.adx_period, last_of(&calculate_wilder(&minus_dm, params.adx_period), "adx")?),
            adx_tr: WilderState::seeded(params.adx_period, last_of(&calculate_wilder(&tr, params.adx_period), "adx")?),
            adx: WilderState::seeded(params.adx_period, last_of(&adx.adx, "adx")?),
            avg_gain: WilderState::seeded(params.rsi_period, last_of(&calculate_wilder(&gains, params.rsi_period), "rsi")?),
            avg_loss: WilderState::seeded(params.rsi_period, last_of(&calculate_wilder(&losses, params.rsi_period), "rsi")?),
            ema_short: EmaState::seeded(params.ema_short, ema_short),
            ema_long: EmaState::seeded(params.ema_long, ema_long),
            psar,
            smoother,
            trend_up,
            prev_trend_up,

            closes: tail(&closes, params.roc_period() + 1),
            roc: last_of(&roc, "roc")?,
            prev_roc: roc.from_end(1),
            mom_ema: EmaState::seeded(mom_period, last_of(&mom, "mom_ema")?),
            prev_mom: mom.from_end(1),
            volumes: tail(&volumes, params.volume_window()),
            highs: tail(&highs, params.chandelier_period()),
            lows: tail(&lows, params.chandelier_period()),

            params,
        })
    }

    /// Step every indicator by one confirmed bar.
    pub fn advance(&mut self, candle: &Candle) {
        let (high, low, close) = (candle.high, candle.low, candle.close);

        let tr = (high - low)
            .max((high - self.prev_close).abs())
            .max((low - self.prev_close).abs());
        self.atr.update(tr);

        let up = high - self.prev_high;
        let down = self.prev_low - low;
        let plus = if up > down && up > Decimal::ZERO { up } else { Decimal::ZERO };
        let minus = if down > up && down > Decimal::ZERO { down } else { Decimal::ZERO };
        let smoothed_plus = self.plus_dm.update(plus);
        let smoothed_minus = self.minus_dm.update(minus);
        let smoothed_tr = self.adx_tr.update(tr);
        let (_, _, dx) = directional_index(smoothed_plus, smoothed_minus, smoothed_tr);
        self.adx.update(dx);

        let delta = close - self.prev_close;
        self.avg_gain.update(delta.max(Decimal::ZERO));
        self.avg_loss.update((-delta).max(Decimal::ZERO));

        self.ema_short.update(close);
        self.ema_long.update(close);
        self.psar.update(high, low, close);

        self.prev_trend_up = self.trend_up;
        let filtered = self.smoother.update(close);
        self.trend_up = close > filtered;

        let roc_period = self.params.roc_period();
        push_bounded(&mut self.closes, close, roc_period + 1);
        let roc = match self.closes.front() {
            Some(base) if self.closes.len() > roc_period => rate_of_change(close, *base),
            _ => Decimal::ZERO,
        };
        self.prev_roc = Some(self.roc);
        self.roc = roc;
        self.prev_mom = self.mom_ema.value();
        self.mom_ema.update(roc);

        push_bounded(&mut self.volumes, candle.volume, self.params.volume_window());
        push_bounded(&mut self.highs, high, self.params.chandelier_period());
        push_bounded(&mut self.lows, low, self.params.chandelier_period());

        self.prev_high = high;
        self.prev_low = low;
        self.prev_close = close;
        self.bars += 1;
    }

    pub fn bars(&self) -> usize {
        self.bars
    }

    pub fn params(&self) -> &IncrementalParams {
        &self.params
    }

    pub fn atr(&self) -> Decimal {
        self.atr.value().unwrap_or_default()
    }

    pub fn snapshot(&self) -> IncrementalSnapshot {
        let tf = &self.params.trend_filter;
        let atr = self.atr();
        let adx = self.adx.value().unwrap_or_default();
        let (plus_di, minus_di, _) = directional_index(
            self.plus_dm.value().unwrap_or_default(),
            self.minus_dm.value().unwrap_or_default(),
            self.adx_tr.value().unwrap_or_default(),
        );
        let rsi = rsi_from_averages(
            self.avg_gain.value().unwrap_or_default(),
            self.avg_loss.value().unwrap_or_default(),
        );
        let mom = self.mom_ema.value().unwrap_or_default();

        let (mom_cross_up, mom_cross_down) = match (self.prev_roc, self.prev_mom) {
            (Some(prev_roc), Some(prev_mom)) => (
                self.roc > mom && prev_roc <= prev_mom,
                self.roc < mom && prev_roc >= prev_mom,
            ),
            _ => (false, false),
        };

        let volume_spike = self.volumes.len() >= self.params.volume_window()
            && match self.volumes.back() {
                Some(latest) => {
                    let total: Decimal = self.volumes.iter().copied().sum();
                    let average = total / Decimal::from(self.volumes.len());
                    *latest > average * tf.volume_spike_multiplier
                }
                None => false,
            };

        let (chandelier_long, chandelier_short) = if atr > Decimal::ZERO {
            let offset = atr * tf.chandelier_multiplier;
            (
                self.highs.iter().copied().max().map(|h| h - offset),
                self.lows.iter().copied().min().map(|l| l + offset),
            )
        } else {
            (None, None)
        };

        let price = self.prev_close;
        let dynamic_adx_ok = if price.is_zero() {
            false
        } else {
            let volatility = atr / price - ADX_VOLATILITY_BASELINE;
            let threshold = (tf.base_adx_threshold * (Decimal::ONE + volatility * tf.adx_volatility_multiplier))
                .max(tf.base_adx_threshold);
            adx > threshold
        };

        IncrementalSnapshot {
            bars: self.bars,
            close: price,
            atr,
            adx,
            plus_di,
            minus_di,
            rsi,
            ema_short: self.ema_short.value().unwrap_or_default(),
            ema_long: self.ema_long.value().unwrap_or_default(),
            psar: self.psar.sar(),
            psar_uptrend: self.psar.is_uptrend(),
            super_smoother: self.smoother.value().unwrap_or_default(),
            trend_up: self.trend_up,
            prev_trend_up: self.prev_trend_up,
            roc: self.roc,
            mom_ema: mom,
            mom_cross_up,
            mom_cross_down,
            volume_spike,
            chandelier_long,
            chandelier_short,
            dynamic_adx_ok,
        }
    }
}
