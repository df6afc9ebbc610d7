//! Volatility indicators: ATR, Bollinger Bands, Vortex

pub mod atr;
pub mod bollinger;
pub mod vortex;

pub use atr::*;
pub use bollinger::*;
pub use vortex::*;
