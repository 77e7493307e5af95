// In crates/position/src/single_unit.rs

use crate::PositionPolicy;
use core_types::{Action, OrderSide, PositionSide, Signal};

/// Holds at most one unit and only reacts to crossings.
///
/// A signal against the open position closes it and leaves the core flat for
/// the rest of the bar. The next entry needs a fresh crossing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleUnitPolicy;

impl SingleUnitPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl PositionPolicy for SingleUnitPolicy {
    fn name(&self) -> &'static str {
        "SingleUnitPolicy"
    }

    fn decide(&self, position: PositionSide, signal: Signal) -> Action {
        match (position, signal) {
            (_, Signal::Hold) => Action::Hold,
            (PositionSide::Flat, Signal::Buy) => Action::Open(OrderSide::Buy),
            (PositionSide::Flat, Signal::Sell) => Action::Open(OrderSide::Sell),
            (PositionSide::Short, Signal::Buy) => Action::Close(PositionSide::Short),
            (PositionSide::Long, Signal::Sell) => Action::Close(PositionSide::Long),
            // Already positioned in the signaled direction.
            (PositionSide::Long, Signal::Buy) | (PositionSide::Short, Signal::Sell) => Action::Hold,
        }
    }
}
