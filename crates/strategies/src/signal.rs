// In crates/strategies/src/signal.rs

use crate::indicators::RsiReading;
use crate::types::TriggerLevels;
use core_types::Signal;

/// Detects a crossing of the trigger levels between two consecutive readings.
///
/// A buy fires when the oscillator moves from at or below `buy` to strictly
/// above it; a sell when it moves from at or above `sell` to strictly below it.
/// If both hold (only when `sell > buy`) the buy wins. Any reading that is not
/// ready yields `Signal::Hold`.
pub fn detect(previous: RsiReading, current: RsiReading, levels: &TriggerLevels) -> Signal {
    let (RsiReading::Ready(previous), RsiReading::Ready(current)) = (previous, current) else {
        return Signal::Hold;
    };

    if previous <= levels.buy && current > levels.buy {
        Signal::Buy
    } else if previous >= levels.sell && current < levels.sell {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn levels(buy: Decimal, sell: Decimal) -> TriggerLevels {
        TriggerLevels { buy, sell }
    }

    fn ready(value: Decimal) -> RsiReading {
        RsiReading::Ready(value)
    }

    #[test]
    fn upward_cross_of_buy_level() {
        let l = levels(dec!(52), dec!(48));
        assert_eq!(detect(ready(dec!(51)), ready(dec!(53)), &l), Signal::Buy);
        // Starting exactly on the level still counts.
        assert_eq!(detect(ready(dec!(52)), ready(dec!(52.1)), &l), Signal::Buy);
        // Landing exactly on the level does not.
        assert_eq!(detect(ready(dec!(51)), ready(dec!(52)), &l), Signal::Hold);
    }

    #[test]
    fn downward_cross_of_sell_level() {
        let l = levels(dec!(52), dec!(48));
        assert_eq!(detect(ready(dec!(49)), ready(dec!(47)), &l), Signal::Sell);
        assert_eq!(detect(ready(dec!(48)), ready(dec!(47.9)), &l), Signal::Sell);
        assert_eq!(detect(ready(dec!(49)), ready(dec!(48)), &l), Signal::Hold);
    }

    #[test]
    fn no_crossing_holds() {
        let l = levels(dec!(52), dec!(48));
        assert_eq!(detect(ready(dec!(53)), ready(dec!(60)), &l), Signal::Hold);
        assert_eq!(detect(ready(dec!(47)), ready(dec!(40)), &l), Signal::Hold);
        assert_eq!(detect(ready(dec!(50)), ready(dec!(50.5)), &l), Signal::Hold);
        // Falling back through the buy level is not a sell.
        assert_eq!(detect(ready(dec!(53)), ready(dec!(51)), &l), Signal::Hold);
    }

    #[test]
    fn degenerate_levels_emit_at_most_one_signal() {
        let l = levels(dec!(50), dec!(50));
        assert_eq!(detect(ready(dec!(50)), ready(dec!(51)), &l), Signal::Buy);
        assert_eq!(detect(ready(dec!(50)), ready(dec!(49)), &l), Signal::Sell);

        // Sell level above buy level.
        let l = levels(dec!(40), dec!(60));
        assert_eq!(detect(ready(dec!(35)), ready(dec!(45)), &l), Signal::Buy);
        assert_eq!(detect(ready(dec!(65)), ready(dec!(55)), &l), Signal::Sell);
        assert_eq!(detect(ready(dec!(45)), ready(dec!(55)), &l), Signal::Hold);
    }

    #[test]
    fn not_ready_holds() {
        let l = levels(dec!(52), dec!(48));
        assert_eq!(detect(RsiReading::NotReady, ready(dec!(60)), &l), Signal::Hold);
        assert_eq!(detect(ready(dec!(40)), RsiReading::NotReady, &l), Signal::Hold);
    }
}
