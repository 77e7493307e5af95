// In crates/engine/src/lib.rs

pub mod bot;
pub mod error;
pub mod reconciler;

pub use bot::{BarOutcome, Bot, CoreState};
pub use error::{Error, Result};
pub use reconciler::Drift;
