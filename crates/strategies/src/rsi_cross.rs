// In crates/strategies/src/rsi_cross.rs

use crate::indicators::WilderRsi;
use crate::signal::detect;
use crate::types::{StrategyParameters, TriggerLevels};
use crate::{Result, Signal, Strategy};
use core_types::Bar;
use rust_decimal::Decimal;

/// RSI breakout strategy: a long entry when the RSI breaks above the buy
/// level, a short entry when it breaks below the sell level.
#[derive(Debug, Clone)]
pub struct RsiCross {
    rsi: WilderRsi,
    levels: TriggerLevels,
}

impl RsiCross {
    /// Creates a new `RsiCross` strategy instance from validated parameters.
    pub fn new(params: &StrategyParameters) -> Result<Self> {
        Ok(Self {
            rsi: WilderRsi::new(params.rsi_period as usize)?,
            levels: params.levels,
        })
    }
}

impl Strategy for RsiCross {
    fn name(&self) -> &'static str {
        "RsiCross"
    }

    fn assess(&mut self, bar: &Bar) -> Signal {
        self.rsi.update(bar.close);
        detect(self.rsi.previous(), self.rsi.current(), &self.levels)
    }

    fn indicator_value(&self) -> Option<Decimal> {
        self.rsi.current().value()
    }
}
