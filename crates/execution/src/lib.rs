// In crates/execution/src/lib.rs

use core_types::{OrderHandle, OrderRequest, PositionSide};
pub mod error;
pub mod lifecycle;
pub mod paper;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use lifecycle::OrderLifecycle;
pub use paper::PaperBroker;
pub use types::{CancelOutcome, OrderIntent, OrderStatus};

/// The boundary to the host platform that owns the position and the order book.
///
/// The core only ever reads from the host and asks it to act. The host is the
/// sole mutator of the position, so every call here is a request, and the
/// position it reports is the ground truth.
pub trait Host {
    /// The name of the host (e.g., "PaperBroker").
    fn name(&self) -> &'static str;

    /// The current net position. Authoritative.
    fn position(&self) -> PositionSide;

    /// Submits an order and returns the handle the host assigned to it.
    ///
    /// # Errors
    ///
    /// `Error::Rejected` when the host declines the order (margin, position
    /// limits, market closed, ...). The core does not interpret the reason.
    fn submit(&mut self, request: &OrderRequest) -> Result<OrderHandle>;

    /// Requests cancellation of a previously submitted order.
    ///
    /// Cancelling an order that is no longer working is reported as
    /// `CancelOutcome::AlreadyInactive`, not as an error.
    fn cancel(&mut self, handle: OrderHandle) -> Result<CancelOutcome>;

    /// The current status of a previously submitted order.
    fn order_status(&self, handle: OrderHandle) -> Result<OrderStatus>;
}
