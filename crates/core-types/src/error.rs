// In crates/core-types/src/error.rs

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Invalid bar #{index}: {reason}")]
    InvalidBar { index: u64, reason: String },

    #[error("Tick size must be positive, got {0}")]
    InvalidTickSize(Decimal),
}

pub type Result<T> = std::result::Result<T, Error>;
