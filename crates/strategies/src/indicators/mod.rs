// In crates/strategies/src/indicators/mod.rs

pub mod rsi;

pub use rsi::{RsiReading, WilderRsi};
