//! Streaming technical-indicator engine and composite signal scorer.

pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod series;
pub mod services;
pub mod signals;
pub mod state;
