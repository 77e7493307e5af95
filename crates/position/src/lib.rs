// In crates/position/src/lib.rs

use core_types::{Action, PositionSide, Signal};
pub mod single_unit;

pub use single_unit::SingleUnitPolicy;

/// The universal interface for the position state machine.
///
/// A `PositionPolicy` looks at the position the host reports and the signal of
/// the current bar and decides what, if anything, to do about it. It never
/// reads prices and never mutates the position itself.
pub trait PositionPolicy {
    /// The name of the policy.
    fn name(&self) -> &'static str;

    /// Decides the action for one bar.
    ///
    /// # Arguments
    ///
    /// * `position`: The authoritative position reported by the host.
    /// * `signal`: The signal produced by the strategy for this bar.
    fn decide(&self, position: PositionSide, signal: Signal) -> Action;
}

/// The side the core expects to hold once the host has carried out `action`.
pub fn expected_side(position: PositionSide, action: Action) -> PositionSide {
    match action {
        Action::Hold => position,
        Action::Open(side) => PositionSide::opened_by(side),
        Action::Close(_) => PositionSide::Flat,
    }
}
