//! Momentum indicators: RSI, MACD, stochastics and oscillators

pub mod macd;
pub mod oscillators;
pub mod rsi;
pub mod stochastic;

pub use macd::*;
pub use oscillators::*;
pub use rsi::*;
pub use stochastic::*;
