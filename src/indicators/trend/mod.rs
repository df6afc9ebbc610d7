//! Trend indicators: moving averages, ADX, PSAR, SuperSmoother

pub mod ema;
pub mod adx;
pub mod psar;
pub mod smoother;

pub use ema::*;
pub use adx::*;
pub use psar::*;
pub use smoother::*;
