// In crates/engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Strategy configuration error: {0}")]
    Configuration(#[from] strategies::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
