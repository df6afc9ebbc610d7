//! Volume indicators: OBV, ADI, CMF, MFI, VWAP, FVE

pub mod fve;
pub mod money_flow;
pub mod obv;
pub mod vwap;

pub use fve::*;
pub use money_flow::*;
pub use obv::*;
pub use vwap::*;
