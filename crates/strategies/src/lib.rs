// In crates/strategies/src/lib.rs

use core_types::{Bar, Signal};
use rust_decimal::Decimal;
pub mod error;
pub mod indicators;
pub mod rsi_cross;
pub mod signal;
pub mod types;

pub use error::{Error, Result};
pub use indicators::RsiReading;

/// The universal interface for a trading strategy.
///
/// A strategy turns the bar stream into exactly one `Signal` per bar. It is
/// stateful: indicator values carry over between calls, so bars must be fed
/// once each and in order.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    fn assess(&mut self, bar: &Bar) -> Signal;

    /// The indicator value behind the last `assess` call, `None` while warming up.
    fn indicator_value(&self) -> Option<Decimal>;
}
