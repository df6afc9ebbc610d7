//! External collaborators feeding the engine.

pub mod market_data;

pub use market_data::{JsonFileMarketData, MarketDataError, MarketDataProvider};
