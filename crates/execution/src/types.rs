// In crates/execution/src/types.rs

use core_types::{OrderHandle, OrderRequest};
use serde::Serialize;

/// Lifecycle state of an order as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderStatus {
    Working,
    Filled,
    Cancelled,
}

impl OrderStatus {
    pub fn is_working(self) -> bool {
        self == OrderStatus::Working
    }
}

/// Result of a cancellation request the host accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CancelOutcome {
    Cancelled,
    /// The order had already filled or been cancelled. Not an error.
    AlreadyInactive,
}

/// A record of one order operation attempted against the host on a bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OrderIntent {
    Submitted {
        request: OrderRequest,
        handle: OrderHandle,
    },
    Rejected {
        request: OrderRequest,
        reason: String,
    },
    CancelRequested {
        handle: OrderHandle,
        outcome: CancelOutcome,
    },
    CancelFailed {
        handle: OrderHandle,
        reason: String,
    },
}

impl OrderIntent {
    /// The order request behind a submission attempt, accepted or not.
    pub fn request(&self) -> Option<&OrderRequest> {
        match self {
            OrderIntent::Submitted { request, .. } | OrderIntent::Rejected { request, .. } => {
                Some(request)
            }
            _ => None,
        }
    }
}
