//! Fixed-precision decimal time series
//!
//! Every indicator is written against [`NumericSeries`]. A position holds
//! `Some(value)` or `None` when the value is undefined (insufficient lookback,
//! overflow, undefined ratio). Rolling aggregates skip undefined positions and
//! only emit a value once `min_periods` defined values are inside the window.

use std::collections::VecDeque;

use rust_decimal::prelude::*;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericSeries {
    values: VecDeque<Option<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_len: Option<usize>,
}

impl NumericSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Series that evicts from the front once `max_len` values are held.
    pub fn bounded(max_len: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(max_len),
            max_len: Some(max_len),
        }
    }

    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        values.into_iter().map(Some).collect()
    }

    pub fn undefined(len: usize) -> Self {
        std::iter::repeat(None).take(len).collect()
    }

    pub fn push(&mut self, value: Option<Decimal>) {
        if let Some(max_len) = self.max_len {
            if max_len == 0 {
                return;
            }
            while self.values.len() >= max_len {
                self.values.pop_front();
            }
        }
        self.values.push_back(value);
    }

    pub fn push_value(&mut self, value: Decimal) {
        self.push(Some(value));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    pub fn get(&self, index: usize) -> Option<Decimal> {
        self.values.get(index).copied().flatten()
    }

    pub fn first(&self) -> Option<Decimal> {
        self.values.front().copied().flatten()
    }

    pub fn last(&self) -> Option<Decimal> {
        self.values.back().copied().flatten()
    }

    /// Value `offset` positions before the last one (`0` is the last value).
    pub fn from_end(&self, offset: usize) -> Option<Decimal> {
        let len = self.values.len();
        if offset >= len {
            return None;
        }
        self.get(len - 1 - offset)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<Decimal>> + '_ {
        self.values.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Option<Decimal>> {
        self.values.iter().copied().collect()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_all_undefined(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    fn derive<I>(&self, values: I) -> Self
    where
        I: IntoIterator<Item = Option<Decimal>>,
    {
        let mut out = NumericSeries {
            values: VecDeque::with_capacity(self.values.len()),
            max_len: self.max_len,
        };
        for value in values {
            out.push(value);
        }
        out
    }

    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(Decimal) -> Option<Decimal>,
    {
        self.derive(self.values.iter().map(|v| v.and_then(&f)))
    }

    /// Run a stateful function over every position in order.
    pub fn scan<F>(&self, mut f: F) -> Self
    where
        F: FnMut(Option<Decimal>) -> Option<Decimal>,
    {
        let values: Vec<Option<Decimal>> = self.values.iter().map(|v| f(*v)).collect();
        self.derive(values)
    }

    /// Combine position by position. Undefined on either side stays undefined.
    pub fn zip_with<F>(&self, other: &NumericSeries, f: F) -> Self
    where
        F: Fn(Decimal, Decimal) -> Option<Decimal>,
    {
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(i, a)| match (a, other.get(i)) {
                (Some(a), Some(b)) => f(*a, b),
                _ => None,
            });
        self.derive(values)
    }

    pub fn add(&self, other: &NumericSeries) -> Self {
        self.zip_with(other, |a, b| a.checked_add(b))
    }

    pub fn sub(&self, other: &NumericSeries) -> Self {
        self.zip_with(other, |a, b| a.checked_sub(b))
    }

    pub fn mul(&self, other: &NumericSeries) -> Self {
        self.zip_with(other, |a, b| a.checked_mul(b))
    }

    /// Division; a zero divisor or overflow leaves the position undefined.
    pub fn div(&self, other: &NumericSeries) -> Self {
        self.zip_with(other, |a, b| if b.is_zero() { None } else { a.checked_div(b) })
    }

    /// Division that substitutes `fallback` for a zero divisor or overflow.
    /// Positions where an operand is undefined remain undefined.
    pub fn div_or(&self, other: &NumericSeries, fallback: Decimal) -> Self {
        self.zip_with(other, |a, b| {
            if b.is_zero() {
                Some(fallback)
            } else {
                Some(a.checked_div(b).unwrap_or(fallback))
            }
        })
    }

    pub fn scale(&self, factor: Decimal) -> Self {
        self.map(|v| v.checked_mul(factor))
    }

    pub fn offset(&self, delta: Decimal) -> Self {
        self.map(|v| v.checked_add(delta))
    }

    pub fn abs(&self) -> Self {
        self.map(|v| Some(v.abs()))
    }

    pub fn max_with(&self, other: &NumericSeries) -> Self {
        self.zip_with(other, |a, b| Some(a.max(b)))
    }

    /// Replace every undefined position with `value`.
    pub fn fill_none(&self, value: Decimal) -> Self {
        self.derive(self.values.iter().map(|v| Some(v.unwrap_or(value))))
    }

    /// Replace undefined positions with the value at the same position in `other`.
    pub fn fill_none_from(&self, other: &NumericSeries) -> Self {
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| v.or_else(|| other.get(i)));
        self.derive(values)
    }

    pub fn forward_fill(&self) -> Self {
        let mut carry = None;
        let values: Vec<Option<Decimal>> = self
            .values
            .iter()
            .map(|v| {
                if v.is_some() {
                    carry = *v;
                }
                carry
            })
            .collect();
        self.derive(values)
    }

    /// Lag by `k` positions; the first `k` positions become undefined.
    pub fn shift(&self, k: usize) -> Self {
        let len = self.values.len();
        let values = (0..len).map(|i| if i < k { None } else { self.get(i - k) });
        self.derive(values)
    }

    pub fn diff(&self, k: usize) -> Self {
        self.sub(&self.shift(k))
    }

    /// Running sum. Undefined positions stay undefined and do not reset the total.
    pub fn cumsum(&self) -> Self {
        let mut total = Decimal::ZERO;
        let values: Vec<Option<Decimal>> = self
            .values
            .iter()
            .map(|v| {
                let value = (*v)?;
                total = total.checked_add(value)?;
                Some(total)
            })
            .collect();
        self.derive(values)
    }

    /// Apply `f` to the defined values of each trailing window of `window`
    /// positions. Emits `None` while fewer than `min_periods` values are defined.
    pub fn rolling<F>(&self, window: usize, min_periods: usize, f: F) -> Self
    where
        F: Fn(&[Decimal]) -> Option<Decimal>,
    {
        if window == 0 {
            return self.derive(std::iter::repeat(None).take(self.values.len()));
        }
        let min_periods = min_periods.clamp(1, window);
        let mut buffer: Vec<Decimal> = Vec::with_capacity(window);
        let values: Vec<Option<Decimal>> = (0..self.values.len())
            .map(|i| {
                let start = (i + 1).saturating_sub(window);
                buffer.clear();
                buffer.extend(self.values.range(start..=i).flatten().copied());
                if buffer.len() >= min_periods {
                    f(&buffer)
                } else {
                    None
                }
            })
            .collect();
        self.derive(values)
    }

    pub fn rolling_sum(&self, window: usize, min_periods: usize) -> Self {
        self.rolling(window, min_periods, sum)
    }

    pub fn rolling_mean(&self, window: usize, min_periods: usize) -> Self {
        self.rolling(window, min_periods, mean)
    }

    pub fn rolling_min(&self, window: usize, min_periods: usize) -> Self {
        self.rolling(window, min_periods, |w| w.iter().copied().min())
    }

    pub fn rolling_max(&self, window: usize, min_periods: usize) -> Self {
        self.rolling(window, min_periods, |w| w.iter().copied().max())
    }

    /// Sample standard deviation (n - 1 denominator).
    pub fn rolling_std(&self, window: usize, min_periods: usize) -> Self {
        self.rolling(window, min_periods, sample_std)
    }

    pub fn rolling_mean_abs_dev(&self, window: usize, min_periods: usize) -> Self {
        self.rolling(window, min_periods, mean_abs_dev)
    }

    pub fn max_value(&self) -> Option<Decimal> {
        self.values.iter().flatten().copied().max()
    }

    pub fn min_value(&self) -> Option<Decimal> {
        self.values.iter().flatten().copied().min()
    }
}

impl FromIterator<Option<Decimal>> for NumericSeries {
    fn from_iter<T: IntoIterator<Item = Option<Decimal>>>(iter: T) -> Self {
        NumericSeries {
            values: iter.into_iter().collect(),
            max_len: None,
        }
    }
}

pub fn sum(values: &[Decimal]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    sum(values)?.checked_div(Decimal::from(values.len()))
}

pub fn sample_std(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let squares = values.iter().try_fold(Decimal::ZERO, |acc, v| {
        let dev = v.checked_sub(avg)?;
        acc.checked_add(dev.checked_mul(dev)?)
    })?;
    squares
        .checked_div(Decimal::from(values.len() - 1))?
        .sqrt()
}

pub fn mean_abs_dev(values: &[Decimal]) -> Option<Decimal> {
    let avg = mean(values)?;
    let deviations = values
        .iter()
        .map(|v| v.checked_sub(avg).map(|d| d.abs()))
        .collect::<Option<Vec<Decimal>>>()?;
    mean(&deviations)
}
