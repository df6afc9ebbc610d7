//! Composite signal scoring.

pub mod decision;
pub mod engine;
pub mod rules;
pub mod scoring;
pub mod weights;

pub use decision::*;
pub use engine::SignalEngine;
pub use rules::{evaluate_rule, RuleOutcome};
pub use scoring::*;
pub use weights::*;
