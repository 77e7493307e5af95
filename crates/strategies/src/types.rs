// In crates/strategies/src/types.rs

use crate::{Error, Result};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw strategy parameters as they appear in the configuration files.
///
/// Kept signed and floating so that out-of-range values reach validation
/// instead of failing deserialization with an opaque message.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RsiCrossSettings {
    /// The previous N bars period the RSI indicator will use.
    pub rsi_period: i64,
    /// Level the RSI must break upward to count as a buy signal.
    pub buy_trigger_level: f64,
    /// Level the RSI must break downward to count as a sell signal.
    pub sell_trigger_level: f64,
    /// Distance between the entry close and the protective stop, in ticks.
    pub stop_distance_ticks: i64,
}

/// The two oscillator thresholds the signal detector compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TriggerLevels {
    pub buy: Decimal,
    pub sell: Decimal,
}

impl TriggerLevels {
    /// A configuration where a fall through `sell` can happen above `buy`.
    pub fn is_degenerate(&self) -> bool {
        self.buy <= self.sell
    }
}

/// Validated, immutable parameters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrategyParameters {
    pub rsi_period: u32,
    pub levels: TriggerLevels,
    pub stop_distance_ticks: u32,
}

impl StrategyParameters {
    /// Absolute price distance of the protective stop for a given tick size.
    pub fn stop_distance(&self, tick_size: Decimal) -> Decimal {
        Decimal::from(self.stop_distance_ticks) * tick_size
    }
}

impl TryFrom<&RsiCrossSettings> for StrategyParameters {
    type Error = Error;

    fn try_from(settings: &RsiCrossSettings) -> Result<Self> {
        if settings.rsi_period <= 0 {
            return Err(Error::InvalidParameters(format!(
                "RSI period must be positive, got {}",
                settings.rsi_period
            )));
        }
        let rsi_period = u32::try_from(settings.rsi_period).map_err(|_| {
            Error::InvalidParameters(format!("RSI period {} is too large", settings.rsi_period))
        })?;

        let buy = trigger_level("buy", settings.buy_trigger_level)?;
        let sell = trigger_level("sell", settings.sell_trigger_level)?;

        if settings.stop_distance_ticks < 0 {
            return Err(Error::InvalidParameters(format!(
                "Stop distance must be non-negative, got {} ticks",
                settings.stop_distance_ticks
            )));
        }
        let stop_distance_ticks = u32::try_from(settings.stop_distance_ticks).map_err(|_| {
            Error::InvalidParameters(format!(
                "Stop distance of {} ticks is too large",
                settings.stop_distance_ticks
            ))
        })?;

        Ok(Self {
            rsi_period,
            levels: TriggerLevels { buy, sell },
            stop_distance_ticks,
        })
    }
}

fn trigger_level(name: &str, value: f64) -> Result<Decimal> {
    if !(0.0..=100.0).contains(&value) {
        return Err(Error::InvalidParameters(format!(
            "RSI {name} trigger level must be within [0, 100], got {value}"
        )));
    }
    Decimal::from_f64(value).ok_or_else(|| {
        Error::InvalidParameters(format!("RSI {name} trigger level {value} is not representable"))
    })
}
