//! Per-market orchestration around the pure signal engine

pub mod context;
pub mod runtime;

pub use context::*;
pub use runtime::*;
