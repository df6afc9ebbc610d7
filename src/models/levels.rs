//! Support and resistance levels

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub label: String,
    pub price: Decimal,
}

impl Level {
    pub fn new(label: impl Into<String>, price: Decimal) -> Self {
        Self {
            label: label.into(),
            price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    Support,
    Resistance,
}

impl LevelKind {
    /// Classification against the price at creation time. A level sitting
    /// exactly at the price is neither.
    pub fn classify(level: Decimal, current_price: Decimal) -> Option<Self> {
        if level < current_price {
            Some(LevelKind::Support)
        } else if level > current_price {
            Some(LevelKind::Resistance)
        } else {
            None
        }
    }
}

/// Levels split by side, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub support: Vec<Level>,
    pub resistance: Vec<Level>,
}

impl LevelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set by classifying each level against `current_price`.
    pub fn classify<I>(levels: I, current_price: Decimal) -> Self
    where
        I: IntoIterator<Item = Level>,
    {
        let mut set = Self::new();
        for level in levels {
            set.insert(level, current_price);
        }
        set
    }

    pub fn insert(&mut self, level: Level, current_price: Decimal) {
        match LevelKind::classify(level.price, current_price) {
            Some(LevelKind::Support) => self.support.push(level),
            Some(LevelKind::Resistance) => self.resistance.push(level),
            None => {}
        }
    }

    pub fn extend(&mut self, other: LevelSet) {
        self.support.extend(other.support);
        self.resistance.extend(other.resistance);
    }

    pub fn len(&self) -> usize {
        self.support.len() + self.resistance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.support.is_empty() && self.resistance.is_empty()
    }
}
