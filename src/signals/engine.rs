//! Signal engine: one pure analysis cycle over an immutable candle window.

use rust_decimal::Decimal;
use tracing::info;

use crate::config::AnalyzerConfig;
use crate::indicators::registry::{IndicatorRegistry, PriceSeries};
use crate::indicators::structure::{
    analyze_order_book_walls, calculate_fibonacci_retracement, calculate_pivot_points, find_nearest_levels,
};
use crate::indicators::volatility::calculate_atr;
use crate::models::analysis::Analysis;
use crate::models::candle::CandleWindow;
use crate::models::levels::LevelSet;
use crate::models::order_book::{OrderBookSnapshot, WallReport};
use crate::models::signal::TradeSignal;
use crate::signals::decision::{decide_action, protective_levels};
use crate::signals::scoring::{apply_wall_boosts, calculate_confidence, score_indicators};
use crate::signals::weights::select_weight_set;

/// Scores candle windows against a fixed configuration. Holds no state
/// between cycles.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: AnalyzerConfig,
    registry: IndicatorRegistry,
}

impl SignalEngine {
    pub fn new(config: AnalyzerConfig) -> Self {
        let registry = IndicatorRegistry::from_config(&config);
        Self { config, registry }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn registry(&self) -> &IndicatorRegistry {
        &self.registry
    }

    pub fn min_bars_required(&self) -> usize {
        self.registry
            .min_bars_required(self.config.min_bars_floor, self.config.min_bars_buffer)
    }

    /// Run one analysis cycle.
    ///
    /// The returned signal is computed regardless of window length; the
    /// minimum-bars gate is applied by the caller using `data_sufficient`.
    pub fn analyze(
        &self,
        window: &CandleWindow,
        order_book: Option<&OrderBookSnapshot>,
        current_price: Decimal,
    ) -> Analysis {
        let config = &self.config;
        let min_bars = self.min_bars_required();
        let Some(last_close) = window.last().map(|c| c.close) else {
            return Analysis::empty(current_price, min_bars);
        };

        let prices = PriceSeries::from_window(window);
        let atr = calculate_atr(
            &prices.high,
            &prices.low,
            &prices.close,
            config.indicator_periods.atr as usize,
        )
        .last()
        .unwrap_or(Decimal::ZERO);

        let (regime, weights) = select_weight_set(config, atr);
        let indicators = self.registry.compute_all(&prices);

        let mut card = score_indicators(&indicators, &weights, current_price, config);

        let walls = match order_book {
            Some(book) if config.order_book_enabled => analyze_order_book_walls(
                book,
                last_close,
                config.order_book_depth_to_check,
                config.order_book_wall_threshold_multiplier,
            ),
            _ => WallReport::default(),
        };
        apply_wall_boosts(&mut card, &walls, config);

        let action = decide_action(card.raw_score, config.signal_score_threshold);
        let (stop_loss, take_profit) = protective_levels(
            action,
            current_price,
            atr,
            config.stop_loss_multiple,
            config.take_profit_multiple,
        );
        let confidence = calculate_confidence(
            card.raw_score,
            weights.total(),
            config.order_book_support_confidence_boost,
        );

        let levels = self.levels(&prices, last_close, current_price);
        let nearest = find_nearest_levels(&levels, current_price, config.num_levels);

        let signal = TradeSignal {
            action,
            confidence,
            raw_score: card.raw_score,
            entry_price: current_price,
            conditions: card.conditions,
            reasons: card.reasons,
            stop_loss,
            take_profit,
        };

        let unavailable = indicators.unavailable();
        info!(
            action = %signal.action,
            raw_score = %signal.raw_score,
            confidence = signal.confidence,
            %regime,
            %atr,
            price = %current_price,
            conditions = ?signal.conditions,
            unavailable = ?unavailable,
            bullish_wall = walls.has_bullish_wall,
            bearish_wall = walls.has_bearish_wall,
            "analysis complete"
        );

        Analysis {
            signal,
            regime,
            atr,
            indicators,
            levels,
            nearest_supports: nearest.supports,
            nearest_resistances: nearest.resistances,
            walls,
            bars_available: window.len(),
            min_bars_required: min_bars,
            data_sufficient: window.len() >= min_bars,
        }
    }

    /// Fibonacci levels from the window range plus pivots from the window
    /// high, low and last close, classified against the live price.
    fn levels(&self, prices: &PriceSeries, last_close: Decimal, current_price: Decimal) -> LevelSet {
        let (Some(high), Some(low)) = (prices.high.max_value(), prices.low.min_value()) else {
            return LevelSet::new();
        };
        let mut levels = calculate_fibonacci_retracement(high, low, current_price);
        levels.extend(LevelSet::classify(
            calculate_pivot_points(high, low, last_close),
            current_price,
        ));
        levels
    }
}
