//! Ehlers two-pole SuperSmoother filter

use rust_decimal::prelude::*;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuperSmoother {
    c1: Decimal,
    c2: Decimal,
    c3: Decimal,
    prev1: Option<Decimal>,
    prev2: Option<Decimal>,
}

impl SuperSmoother {
    /// Coefficients are fixed once from the period. `None` for a zero period.
    pub fn new(period: usize) -> Option<Self> {
        if period == 0 {
            return None;
        }
        let arg = dec!(1.414) * Decimal::PI / Decimal::from(period);
        let a1 = (-arg).checked_exp()?;
        let b1 = Decimal::TWO * a1 * arg.checked_cos()?;
        let c2 = b1;
        let c3 = -(a1 * a1);
        let c1 = Decimal::ONE - c2 - c3;
        Some(Self {
            c1,
            c2,
            c3,
            prev1: None,
            prev2: None,
        })
    }

    pub fn value(&self) -> Option<Decimal> {
        self.prev1
    }

    pub fn previous(&self) -> Option<Decimal> {
        self.prev2
    }

    /// The first input seeds both filter taps with the raw price.
    pub fn update(&mut self, price: Decimal) -> Decimal {
        let prev1 = self.prev1.unwrap_or(price);
        let prev2 = self.prev2.unwrap_or(prev1);
        let filtered = self.c1 * price + self.c2 * prev1 + self.c3 * prev2;
        self.prev2 = Some(prev1);
        self.prev1 = Some(filtered);
        filtered
    }
}
