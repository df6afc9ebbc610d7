//! Per-symbol carry-over state for O(1) indicator updates.

pub mod incremental;
pub mod psar;
pub mod smoothing;
pub mod super_smoother;

pub use incremental::{IncrementalIndicatorState, IncrementalParams, IncrementalSnapshot};
pub use psar::PsarState;
pub use smoothing::{EmaState, WilderState};
pub use super_smoother::SuperSmoother;
