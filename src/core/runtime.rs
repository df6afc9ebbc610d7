//! Multi-symbol analysis runtime

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::config::AnalyzerConfig;
use crate::core::context::{CycleReport, SymbolContext};
use crate::indicators::error::IndicatorError;
use crate::models::candle::{Candle, PushOutcome};
use crate::models::order_book::OrderBookSnapshot;
use crate::signals::SignalEngine;

/// Key of one market: (symbol, interval).
pub type MarketKey = (String, String);

/// Holds one independent [`SymbolContext`] per (symbol, interval). The
/// engine is shared read-only; windows and incremental state never are.
#[derive(Debug, Clone)]
pub struct AnalysisRuntime {
    engine: Arc<SignalEngine>,
    contexts: BTreeMap<MarketKey, SymbolContext>,
}

impl AnalysisRuntime {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            engine: Arc::new(SignalEngine::new(config)),
            contexts: BTreeMap::new(),
        }
    }

    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }

    fn key(symbol: &str, interval: &str) -> MarketKey {
        (symbol.to_string(), interval.to_string())
    }

    /// Context for a market, created empty on first use.
    pub fn context_mut(&mut self, symbol: &str, interval: &str) -> &mut SymbolContext {
        let engine = &self.engine;
        self.contexts.entry(Self::key(symbol, interval)).or_insert_with(|| {
            info!(symbol, interval, "creating analysis context");
            SymbolContext::new(symbol, interval, Arc::clone(engine))
        })
    }

    pub fn context(&self, symbol: &str, interval: &str) -> Option<&SymbolContext> {
        self.contexts.get(&Self::key(symbol, interval))
    }

    pub fn load_history(&mut self, symbol: &str, interval: &str, candles: Vec<Candle>) -> Result<(), IndicatorError> {
        self.context_mut(symbol, interval).load_history(candles)
    }

    pub fn ingest(&mut self, symbol: &str, interval: &str, candle: Candle) -> PushOutcome {
        self.context_mut(symbol, interval).ingest(candle)
    }

    /// Run a cycle for a known market. `None` if no bar was ever seen for it.
    pub fn run_cycle(
        &self,
        symbol: &str,
        interval: &str,
        order_book: Option<&OrderBookSnapshot>,
        current_price: Option<Decimal>,
    ) -> Option<CycleReport> {
        self.context(symbol, interval)
            .map(|ctx| ctx.run_cycle(order_book, current_price))
    }

    pub fn markets(&self) -> impl Iterator<Item = &MarketKey> + '_ {
        self.contexts.keys()
    }

    pub fn remove(&mut self, symbol: &str, interval: &str) -> Option<SymbolContext> {
        self.contexts.remove(&Self::key(symbol, interval))
    }

    /// Hand the contexts out, e.g. to run them on separate threads.
    pub fn into_contexts(self) -> BTreeMap<MarketKey, SymbolContext> {
        self.contexts
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
