//! Market data collaborator contract.
//!
//! The engine never fetches data itself; a provider hands it candles and
//! order-book snapshots that were already retrieved. `JsonFileMarketData`
//! reads exchange-format payloads saved to disk.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::indicators::error::IndicatorError;
use crate::indicators::parser::{parse_book_side, parse_klines};
use crate::models::candle::Candle;
use crate::models::order_book::OrderBookSnapshot;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid market data: {0}")]
    Parse(#[from] IndicatorError),

    #[error("no data for {0}")]
    NoData(String),
}

pub trait MarketDataProvider {
    /// Candles ascending by open time, at most `limit` of the most recent.
    fn get_candles(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>, MarketDataError>;

    fn get_latest_price(&self, symbol: &str) -> Result<Decimal, MarketDataError>;

    /// Top `depth` levels per side.
    fn get_order_book(&self, symbol: &str, depth: usize) -> Result<OrderBookSnapshot, MarketDataError>;
}

/// Kline payload: either the exchange's `{"list": [...]}` result object or
/// a bare array of rows.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KlinePayload {
    Wrapped { list: Vec<Vec<String>> },
    Rows(Vec<Vec<String>>),
}

#[derive(Debug, Deserialize)]
struct BookPayload {
    #[serde(alias = "b")]
    bids: Vec<Vec<String>>,
    #[serde(alias = "a")]
    asks: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct JsonFileMarketData {
    candles_path: PathBuf,
    order_book_path: Option<PathBuf>,
}

impl JsonFileMarketData {
    pub fn new(candles_path: impl Into<PathBuf>) -> Self {
        Self {
            candles_path: candles_path.into(),
            order_book_path: None,
        }
    }

    pub fn with_order_book(mut self, path: impl Into<PathBuf>) -> Self {
        self.order_book_path = Some(path.into());
        self
    }

    pub fn has_order_book(&self) -> bool {
        self.order_book_path.is_some()
    }

    fn read(path: &Path) -> Result<String, MarketDataError> {
        std::fs::read_to_string(path).map_err(|source| MarketDataError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn load_candles(&self) -> Result<Vec<Candle>, MarketDataError> {
        let rows = match serde_json::from_str::<KlinePayload>(&Self::read(&self.candles_path)?)? {
            KlinePayload::Wrapped { list } => list,
            KlinePayload::Rows(rows) => rows,
        };
        Ok(parse_klines(&rows)?)
    }
}

impl MarketDataProvider for JsonFileMarketData {
    fn get_candles(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>, MarketDataError> {
        let mut candles = self.load_candles()?;
        if candles.len() > limit {
            candles.drain(..candles.len() - limit);
        }
        debug!(symbol, interval, count = candles.len(), path = %self.candles_path.display(), "candles loaded");
        Ok(candles)
    }

    fn get_latest_price(&self, symbol: &str) -> Result<Decimal, MarketDataError> {
        self.load_candles()?
            .last()
            .map(|c| c.close)
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))
    }

    fn get_order_book(&self, symbol: &str, depth: usize) -> Result<OrderBookSnapshot, MarketDataError> {
        let Some(path) = &self.order_book_path else {
            return Err(MarketDataError::NoData(format!("{symbol} order book")));
        };
        let payload: BookPayload = serde_json::from_str(&Self::read(path)?)?;
        let mut bids = parse_book_side(&payload.bids)?;
        let mut asks = parse_book_side(&payload.asks)?;
        bids.truncate(depth);
        asks.truncate(depth);
        debug!(symbol, bids = bids.len(), asks = asks.len(), "order book loaded");
        Ok(OrderBookSnapshot::new(bids, asks))
    }
}
