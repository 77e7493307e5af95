// In crates/execution/src/error.rs

use core_types::OrderHandle;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Order rejected by host: {reason}")]
    Rejected { reason: String },

    #[error("Host does not know order {0}")]
    UnknownOrder(OrderHandle),
}

pub type Result<T> = std::result::Result<T, Error>;
