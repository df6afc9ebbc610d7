//! OHLCV candles and the bounded per-(symbol, interval) window

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::series::NumericSeries;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl Candle {
    pub fn new(
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
        open_time: DateTime<Utc>,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// What to do with a bar whose open_time is already in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    Overwrite,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Appended,
    /// An existing bar with the same open_time was replaced.
    Replaced,
    Duplicate,
    OutOfOrder,
}

/// Bounded FIFO buffer of candles ordered ascending by open_time.
#[derive(Debug, Clone)]
pub struct CandleWindow {
    candles: VecDeque<Candle>,
    max_len: usize,
    policy: DuplicatePolicy,
}

impl CandleWindow {
    pub fn new(max_len: usize) -> Self {
        Self {
            candles: VecDeque::with_capacity(max_len),
            max_len: max_len.max(1),
            policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build a window from an unordered backlog. Bars are sorted by open_time
    /// and pushed one by one, so duplicates follow the window policy.
    pub fn from_history(max_len: usize, policy: DuplicatePolicy, mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.open_time);
        let mut window = Self::new(max_len).with_policy(policy);
        for candle in candles {
            window.push(candle);
        }
        window
    }

    pub fn push(&mut self, candle: Candle) -> PushOutcome {
        match self.candles.back() {
            Some(last) if candle.open_time <= last.open_time => {
                let Some(index) = self
                    .candles
                    .iter()
                    .position(|c| c.open_time == candle.open_time)
                else {
                    return PushOutcome::OutOfOrder;
                };
                match self.policy {
                    DuplicatePolicy::Overwrite => {
                        self.candles[index] = candle;
                        PushOutcome::Replaced
                    }
                    DuplicatePolicy::Reject => PushOutcome::Duplicate,
                }
            }
            _ => {
                while self.candles.len() >= self.max_len {
                    self.candles.pop_front();
                }
                self.candles.push_back(candle);
                PushOutcome::Appended
            }
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candle> + '_ {
        self.candles.iter()
    }

    pub fn to_vec(&self) -> Vec<Candle> {
        self.candles.iter().cloned().collect()
    }

    pub fn opens(&self) -> NumericSeries {
        self.column(|c| c.open)
    }

    pub fn highs(&self) -> NumericSeries {
        self.column(|c| c.high)
    }

    pub fn lows(&self) -> NumericSeries {
        self.column(|c| c.low)
    }

    pub fn closes(&self) -> NumericSeries {
        self.column(|c| c.close)
    }

    pub fn volumes(&self) -> NumericSeries {
        self.column(|c| c.volume)
    }

    fn column<F>(&self, f: F) -> NumericSeries
    where
        F: Fn(&Candle) -> Decimal,
    {
        NumericSeries::from_values(self.candles.iter().map(f))
    }
}
