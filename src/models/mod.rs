//! Shared data models spanning the engine layers.

pub mod analysis;
pub mod candle;
pub mod indicators;
pub mod levels;
pub mod order_book;
pub mod signal;

pub use analysis::{Analysis, VolatilityRegime};
pub use candle::{Candle, CandleWindow, DuplicatePolicy, PushOutcome};
pub use indicators::{Bias, IndicatorValue, IndicatorValues, Interpretation};
pub use levels::{Level, LevelKind, LevelSet};
pub use order_book::{BookLevel, OrderBookSnapshot, WallReport};
pub use signal::{SignalAction, SignalReason, TradeSignal};
