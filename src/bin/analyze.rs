//! Confluence Analyzer
//!
//! Runs one analysis cycle over candles and an optional order book saved as
//! exchange-format JSON, then logs the resulting trade signal.

use std::env;
use std::path::Path;

use confluence::config::{self, validate, AnalyzerConfig};
use confluence::core::AnalysisRuntime;
use confluence::logging;
use confluence::services::{JsonFileMarketData, MarketDataProvider};
use dotenvy::dotenv;
use tracing::{debug, info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let environment = config::get_environment();
    info!(environment = %environment, "Starting Confluence Analyzer");

    let config = match env::var("CONFIG_FILE") {
        Ok(path) if !path.is_empty() => config::load_config(Path::new(&path))?,
        _ => {
            info!("CONFIG_FILE not set, using defaults");
            let mut config = AnalyzerConfig::default();
            config::apply_env_overrides(&mut config);
            validate::sanitize(&mut config);
            config
        }
    };

    let symbol = env::var("SYMBOL").unwrap_or_else(|_| "BTCUSDT".to_string());
    let candles_path = env::var("CANDLES_FILE").map_err(|_| "CANDLES_FILE must point to a kline JSON file")?;

    let mut provider = JsonFileMarketData::new(&candles_path);
    if let Ok(path) = env::var("ORDER_BOOK_FILE") {
        if !path.is_empty() {
            provider = provider.with_order_book(path);
        }
    }

    let interval = config.interval.clone();
    let candles = provider.get_candles(&symbol, &interval, config.max_candles)?;
    let latest_price = provider.get_latest_price(&symbol).ok();

    let order_book = if provider.has_order_book() {
        match provider.get_order_book(&symbol, config.order_book_depth_to_check) {
            Ok(book) => Some(book),
            Err(e) => {
                warn!(error = %e, "order book unavailable, continuing without it");
                None
            }
        }
    } else {
        None
    };

    let mut runtime = AnalysisRuntime::new(config);
    runtime.load_history(&symbol, &interval, candles)?;

    let Some(report) = runtime.run_cycle(&symbol, &interval, order_book.as_ref(), latest_price) else {
        return Err(format!("no analysis context for {symbol}").into());
    };

    let signal = &report.analysis.signal;
    info!(
        symbol = %report.symbol,
        interval = %report.interval,
        action = %signal.action,
        confidence = signal.confidence,
        raw_score = %signal.raw_score,
        entry = %signal.entry_price,
        stop_loss = ?signal.stop_loss,
        take_profit = ?signal.take_profit,
        regime = %report.analysis.regime,
        "Trade signal"
    );

    for (kind, value) in report.analysis.indicators.iter() {
        match value {
            Some(value) => {
                let reading = value.interpret(kind, signal.entry_price);
                debug!(indicator = kind.as_str(), value = ?value.primary(), bias = ?reading.bias, label = %reading.label);
            }
            None => debug!(indicator = kind.as_str(), "unavailable"),
        }
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
