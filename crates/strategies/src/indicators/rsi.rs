// In crates/strategies/src/indicators/rsi.rs

//! Relative Strength Index with Wilder smoothing over `Decimal` closes.
//!
//! The first value is seeded from the simple average of the first `period`
//! price changes, so it is available once `period + 1` closes have been seen.
//! After that both averages follow `avg = (avg * (period - 1) + x) / period`.

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use ta::{Next, Period, Reset};

/// The oscillator value for a bar, or an explicit warm-up marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RsiReading {
    /// Fewer than `period + 1` closes observed.
    #[default]
    NotReady,
    /// A value in `[0, 100]`.
    Ready(Decimal),
}

impl RsiReading {
    pub fn value(self) -> Option<Decimal> {
        match self {
            RsiReading::Ready(value) => Some(value),
            RsiReading::NotReady => None,
        }
    }

    pub fn is_ready(self) -> bool {
        matches!(self, RsiReading::Ready(_))
    }
}

#[derive(Debug, Clone)]
pub struct WilderRsi {
    period: usize,
    last_close: Option<Decimal>,
    /// Number of price changes observed so far.
    changes: usize,
    avg_gain: Decimal,
    avg_loss: Decimal,
    current: RsiReading,
    previous: RsiReading,
}

impl WilderRsi {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(Error::InvalidParameters(
                "RSI period must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            period,
            last_close: None,
            changes: 0,
            avg_gain: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            current: RsiReading::NotReady,
            previous: RsiReading::NotReady,
        })
    }

    /// Feeds one close and returns the reading for that bar.
    pub fn update(&mut self, close: Decimal) -> RsiReading {
        self.previous = self.current;

        let Some(last_close) = self.last_close.replace(close) else {
            return self.current;
        };

        let change = close - last_close;
        let gain = change.max(Decimal::ZERO);
        let loss = (-change).max(Decimal::ZERO);
        let period = Decimal::from(self.period);
        self.changes += 1;

        if self.changes <= self.period {
            // Seeding: accumulate sums, divide once the window is full.
            self.avg_gain += gain;
            self.avg_loss += loss;
            if self.changes < self.period {
                return self.current;
            }
            self.avg_gain /= period;
            self.avg_loss /= period;
        } else {
            let keep = period - Decimal::ONE;
            self.avg_gain = (self.avg_gain * keep + gain) / period;
            self.avg_loss = (self.avg_loss * keep + loss) / period;
        }

        self.current = RsiReading::Ready(rsi_value(self.avg_gain, self.avg_loss));
        self.current
    }

    pub fn current(&self) -> RsiReading {
        self.current
    }

    /// The reading of the bar before the current one.
    pub fn previous(&self) -> RsiReading {
        self.previous
    }
}

/// `100 * g / (g + l)`, which equals `100 - 100 / (1 + g / l)` without the
/// division by a vanishing `l`. No movement at all reads as 50.
fn rsi_value(avg_gain: Decimal, avg_loss: Decimal) -> Decimal {
    let total = avg_gain + avg_loss;
    if total.is_zero() {
        return Decimal::from(50);
    }
    (avg_gain / total) * Decimal::ONE_HUNDRED
}

impl Next<Decimal> for WilderRsi {
    type Output = RsiReading;

    fn next(&mut self, input: Decimal) -> Self::Output {
        self.update(input)
    }
}

impl Period for WilderRsi {
    fn period(&self) -> usize {
        self.period
    }
}

impl Reset for WilderRsi {
    fn reset(&mut self) {
        self.last_close = None;
        self.changes = 0;
        self.avg_gain = Decimal::ZERO;
        self.avg_loss = Decimal::ZERO;
        self.current = RsiReading::NotReady;
        self.previous = RsiReading::NotReady;
    }
}

impl fmt::Display for WilderRsi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RSI({})", self.period)
    }
}
