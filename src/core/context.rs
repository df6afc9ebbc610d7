//! Per-(symbol, interval) analysis context.
//!
//! Owns the candle window and the incremental indicator state for one
//! market. Nothing in here is shared with other contexts, so contexts can be
//! moved to separate threads freely.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::indicators::error::IndicatorError;
use crate::models::analysis::Analysis;
use crate::models::candle::{Candle, CandleWindow, PushOutcome};
use crate::models::order_book::OrderBookSnapshot;
use crate::models::signal::TradeSignal;
use crate::signals::SignalEngine;
use crate::state::{IncrementalIndicatorState, IncrementalParams, IncrementalSnapshot};

/// Output of one cycle for one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub symbol: String,
    pub interval: String,
    pub analysis: Analysis,
    pub trend: Option<IncrementalSnapshot>,
}

#[derive(Debug, Clone)]
pub struct SymbolContext {
    symbol: String,
    interval: String,
    engine: Arc<SignalEngine>,
    window: CandleWindow,
    state: Option<IncrementalIndicatorState>,
}

impl SymbolContext {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>, engine: Arc<SignalEngine>) -> Self {
        let config = engine.config();
        let window = CandleWindow::new(config.max_candles).with_policy(config.duplicate_policy);
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            engine,
            window,
            state: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> &str {
        &self.interval
    }

    pub fn window(&self) -> &CandleWindow {
        &self.window
    }

    pub fn incremental(&self) -> Option<&IncrementalIndicatorState> {
        self.state.as_ref()
    }

    /// Replace the window with a backlog and run the warm-up pass over it.
    pub fn load_history(&mut self, candles: Vec<Candle>) -> Result<(), IndicatorError> {
        let config = self.engine.config();
        self.window = CandleWindow::from_history(config.max_candles, config.duplicate_policy, candles);
        self.state = None;
        self.warm_up()
    }

    /// Add one confirmed bar. An appended bar steps the incremental state;
    /// a replaced bar invalidates it and triggers a warm-up over the window.
    pub fn ingest(&mut self, candle: Candle) -> PushOutcome {
        let outcome = self.window.push(candle.clone());
        match outcome {
            PushOutcome::Appended => match self.state.as_mut() {
                Some(state) => state.advance(&candle),
                None => self.warm_up_logged(),
            },
            PushOutcome::Replaced => {
                debug!(symbol = %self.symbol, open_time = %candle.open_time, "bar replaced, re-warming state");
                self.state = None;
                self.warm_up_logged();
            }
            PushOutcome::Duplicate | PushOutcome::OutOfOrder => {
                warn!(
                    symbol = %self.symbol,
                    interval = %self.interval,
                    open_time = %candle.open_time,
                    ?outcome,
                    "candle rejected"
                );
            }
        }
        outcome
    }

    fn warm_up(&mut self) -> Result<(), IndicatorError> {
        if self.window.is_empty() {
            return Ok(());
        }
        let params = IncrementalParams::from_config(self.engine.config());
        let candles = self.window.to_vec();
        self.state = Some(IncrementalIndicatorState::initialize_from_history(params, &candles)?);
        Ok(())
    }

    fn warm_up_logged(&mut self) {
        if let Err(e) = self.warm_up() {
            warn!(symbol = %self.symbol, error = %e, "incremental state unavailable");
        }
    }

    /// Analyze the current window. Below the minimum-bars gate the signal is
    /// forced to HOLD while indicator values are still reported.
    pub fn run_cycle(&self, order_book: Option<&OrderBookSnapshot>, current_price: Option<Decimal>) -> CycleReport {
        let price = current_price
            .or_else(|| self.window.last().map(|c| c.close))
            .unwrap_or(Decimal::ZERO);

        let mut analysis = self.engine.analyze(&self.window, order_book, price);
        if !analysis.data_sufficient {
            warn!(
                symbol = %self.symbol,
                interval = %self.interval,
                bars = analysis.bars_available,
                required = analysis.min_bars_required,
                "insufficient data, holding"
            );
            analysis.signal = TradeSignal::hold(price);
        }

        CycleReport {
            symbol: self.symbol.clone(),
            interval: self.interval.clone(),
            analysis,
            trend: self.state.as_ref().map(IncrementalIndicatorState::snapshot),
        }
    }
}
