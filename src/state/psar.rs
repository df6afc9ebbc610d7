//! Parabolic SAR single-step state

use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsarState {
    step: Decimal,
    max_step: Decimal,
    trend_up: bool,
    sar: Decimal,
    extreme_point: Decimal,
    acceleration: Decimal,
    prev_high: Decimal,
    prev_low: Decimal,
    prev2_high: Option<Decimal>,
    prev2_low: Option<Decimal>,
    /// Close of the seed bar while the trend is still undecided.
    seed_close: Option<Decimal>,
}

impl PsarState {
    /// Seed from the first bar. SAR starts at the close; the trend and the
    /// extreme point are fixed when the second bar arrives.
    pub fn seed(high: Decimal, low: Decimal, close: Decimal, step: Decimal, max_step: Decimal) -> Self {
        Self {
            step,
            max_step,
            trend_up: false,
            sar: close,
            extreme_point: low,
            acceleration: step,
            prev_high: high,
            prev_low: low,
            prev2_high: None,
            prev2_low: None,
            seed_close: Some(close),
        }
    }

    pub fn sar(&self) -> Decimal {
        self.sar
    }

    /// Reads `false` until the second bar decides the trend.
    pub fn is_uptrend(&self) -> bool {
        self.trend_up
    }

    pub fn extreme_point(&self) -> Decimal {
        self.extreme_point
    }

    pub fn acceleration(&self) -> Decimal {
        self.acceleration
    }

    /// Advance by one bar and return the SAR for that bar.
    pub fn update(&mut self, high: Decimal, low: Decimal, close: Decimal) -> Decimal {
        // The bar after the seed has no prior range to clamp against, so it
        // is clamped to its own range instead.
        let first = match self.seed_close.take() {
            Some(seed_close) => {
                self.trend_up = close > seed_close;
                self.extreme_point = if self.trend_up { self.prev_high } else { self.prev_low };
                true
            }
            None => false,
        };

        let prior = self.sar;
        let mut sar = prior + self.acceleration * (self.extreme_point - prior);

        if self.trend_up {
            sar = if first {
                sar.min(low)
            } else {
                self.prev2_low.map_or(self.prev_low, |l| l.min(self.prev_low)).min(sar)
            };
            if high > self.extreme_point {
                self.extreme_point = high;
                self.acceleration = (self.acceleration + self.step).min(self.max_step);
            }
            if low < sar {
                self.trend_up = false;
                sar = self.extreme_point;
                self.extreme_point = low;
                self.acceleration = self.step;
            }
        } else {
            sar = if first {
                sar.max(high)
            } else {
                self.prev2_high.map_or(self.prev_high, |h| h.max(self.prev_high)).max(sar)
            };
            if low < self.extreme_point {
                self.extreme_point = low;
                self.acceleration = (self.acceleration + self.step).min(self.max_step);
            }
            if high > sar {
                self.trend_up = true;
                sar = self.extreme_point;
                self.extreme_point = high;
                self.acceleration = self.step;
            }
        }

        self.sar = sar;
        self.prev2_high = Some(self.prev_high);
        self.prev2_low = Some(self.prev_low);
        self.prev_high = high;
        self.prev_low = low;
        sar
    }
}
