//! Parsing of raw exchange payloads into decimal models.
//!
//! Exchanges deliver prices and sizes as strings; conversion to `Decimal`
//! happens here, once, at the edge.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::indicators::error::IndicatorError;
use crate::models::candle::Candle;
use crate::models::order_book::BookLevel;

pub fn parse_decimal(value: &str) -> Result<Decimal, IndicatorError> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| IndicatorError::InvalidNumericFormat(value.to_string()))
}

pub fn parse_u32(value: &str) -> Result<u32, IndicatorError> {
    value
        .parse::<u32>()
        .map_err(|_| IndicatorError::InvalidNumericFormat(value.to_string()))
}

/// Millisecond epoch timestamp.
pub fn parse_timestamp_ms(value: &str) -> Result<DateTime<Utc>, IndicatorError> {
    let millis = value
        .trim()
        .parse::<i64>()
        .map_err(|_| IndicatorError::InvalidNumericFormat(value.to_string()))?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| IndicatorError::InvalidNumericFormat(value.to_string()))
}

fn field<'a>(row: &'a [String], index: usize, name: &str) -> Result<&'a str, IndicatorError> {
    row.get(index)
        .map(String::as_str)
        .ok_or_else(|| IndicatorError::MissingField(name.to_string()))
}

/// Kline row `[start_ms, open, high, low, close, volume, ...]`.
pub fn parse_kline_row(row: &[String]) -> Result<Candle, IndicatorError> {
    Ok(Candle::new(
        parse_decimal(field(row, 1, "open")?)?,
        parse_decimal(field(row, 2, "high")?)?,
        parse_decimal(field(row, 3, "low")?)?,
        parse_decimal(field(row, 4, "close")?)?,
        parse_decimal(field(row, 5, "volume")?)?,
        parse_timestamp_ms(field(row, 0, "start")?)?,
    ))
}

/// Parse kline rows and return them ascending by open time. Exchanges often
/// deliver newest first.
pub fn parse_klines(rows: &[Vec<String>]) -> Result<Vec<Candle>, IndicatorError> {
    let mut candles = rows
        .iter()
        .map(|row| parse_kline_row(row))
        .collect::<Result<Vec<_>, _>>()?;
    candles.sort_by_key(|c| c.open_time);
    Ok(candles)
}

/// Candle from a keyed map (`start`, `open`, `high`, `low`, `close`, `volume`).
pub fn parse_candle_from_map(data: &HashMap<String, String>) -> Result<Candle, IndicatorError> {
    let get = |key: &str| {
        data.get(key)
            .map(String::as_str)
            .ok_or_else(|| IndicatorError::MissingField(key.to_string()))
    };
    Ok(Candle::new(
        parse_decimal(get("open")?)?,
        parse_decimal(get("high")?)?,
        parse_decimal(get("low")?)?,
        parse_decimal(get("close")?)?,
        parse_decimal(get("volume")?)?,
        parse_timestamp_ms(get("start")?)?,
    ))
}

/// Book side rows `[price, quantity]`.
pub fn parse_book_side(rows: &[Vec<String>]) -> Result<Vec<BookLevel>, IndicatorError> {
    rows.iter()
        .map(|row| {
            Ok(BookLevel::new(
                parse_decimal(field(row, 0, "price")?)?,
                parse_decimal(field(row, 1, "quantity")?)?,
            ))
        })
        .collect()
}
