//! Recursive smoothing kernels shared by the full-history indicators and the
//! incremental engine.

use rust_decimal::Decimal;

/// `adjust=False` exponential moving average, alpha = 2 / (span + 1).
/// The first observed value is the seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaState {
    alpha: Decimal,
    value: Option<Decimal>,
}

impl EmaState {
    pub fn new(span: usize) -> Self {
        Self {
            alpha: Decimal::TWO / Decimal::from(span + 1),
            value: None,
        }
    }

    pub fn seeded(span: usize, value: Decimal) -> Self {
        Self {
            value: Some(value),
            ..Self::new(span)
        }
    }

    pub fn alpha(&self) -> Decimal {
        self.alpha
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value
    }

    pub fn update(&mut self, input: Decimal) -> Decimal {
        let next = match self.value {
            None => input,
            Some(prev) => self.alpha * input + (Decimal::ONE - self.alpha) * prev,
        };
        self.value = Some(next);
        next
    }
}

/// Wilder smoothing: `(prev * (period - 1) + current) / period`.
/// The first observed value is the seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WilderState {
    period: Decimal,
    value: Option<Decimal>,
}

impl WilderState {
    pub fn new(period: usize) -> Self {
        Self {
            period: Decimal::from(period.max(1)),
            value: None,
        }
    }

    pub fn seeded(period: usize, value: Decimal) -> Self {
        Self {
            value: Some(value),
            ..Self::new(period)
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value
    }

    pub fn update(&mut self, input: Decimal) -> Decimal {
        let next = match self.value {
            None => input,
            Some(prev) => (prev * (self.period - Decimal::ONE) + input) / self.period,
        };
        self.value = Some(next);
        next
    }
}
