// In crates/app-config/src/types.rs

use crate::{Error, Result};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use strategies::types::{RsiCrossSettings, StrategyParameters};

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// The single instrument the engine trades.
    pub instrument: InstrumentSettings,
    /// Parameters of the RSI breakout strategy.
    pub strategy: RsiCrossSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct InstrumentSettings {
    pub symbol: String,
    /// Minimum price increment, as configured.
    pub tick_size: f64,
}

/// Host-side session policy used by paper runs.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SessionSettings {
    /// Force the position flat after this many bars. `None` disables it.
    #[serde(default)]
    pub bars_per_session: Option<u32>,
}

impl Settings {
    /// Validated strategy parameters. The engine must not run without them.
    pub fn strategy_parameters(&self) -> Result<StrategyParameters> {
        Ok(StrategyParameters::try_from(&self.strategy)?)
    }
}

impl InstrumentSettings {
    pub fn tick_size(&self) -> Result<Decimal> {
        let tick = self.tick_size;
        match Decimal::from_f64(tick) {
            Some(value) if value > Decimal::ZERO => Ok(value),
            _ => Err(Error::InvalidTickSize(tick.to_string())),
        }
    }
}
