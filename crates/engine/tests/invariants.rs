//! Property tests for the per-bar invariants.
//!
//! Over random price walks with random host-side interference:
//! 1. The host never holds more than one unit.
//! 2. A protective stop is recorded exactly when the host position is open,
//!    it opposes that position, and it is the only working order.
//! 3. Every bar yields exactly one signal and the indicator stays in [0, 100].

use core_types::{Bar, PositionSide};
use engine::Bot;
use execution::{Host, OrderStatus, PaperBroker};
use proptest::prelude::*;
use rust_decimal::Decimal;
use strategies::types::{RsiCrossSettings, StrategyParameters};

#[derive(Debug, Clone, Copy)]
enum Interference {
    None,
    FillStop,
    ForceFlatten,
}

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_interference() -> impl Strategy<Value = Interference> {
    prop_oneof![
        8 => Just(Interference::None),
        1 => Just(Interference::FillStop),
        1 => Just(Interference::ForceFlatten),
    ]
}

fn arb_step() -> impl Strategy<Value = (i64, Interference)> {
    (-40i64..=40, arb_interference())
}

fn arb_settings() -> impl Strategy<Value = RsiCrossSettings> {
    (1i64..8, 30.0..70.0_f64, 0.0..30.0_f64, 0i64..20).prop_map(
        |(rsi_period, buy, spread, stop_distance_ticks)| RsiCrossSettings {
            rsi_period,
            buy_trigger_level: buy.round(),
            sell_trigger_level: (buy - spread).max(0.0).round(),
            stop_distance_ticks,
        },
    )
}

fn check_invariants(bot: &Bot, host: &PaperBroker) -> Result<(), TestCaseError> {
    let state = bot.state();
    let position = host.position();

    prop_assert!(host.net_position().abs() <= 1);
    prop_assert_eq!(state.last_known_side, position);
    prop_assert_eq!(state.stop.is_some(), position != PositionSide::Flat);
    if let Some(stop) = &state.stop {
        prop_assert!(stop.protects(position));
        prop_assert_eq!(host.order_status(stop.handle), Ok(OrderStatus::Working));
    }
    prop_assert_eq!(host.working_orders().count(), usize::from(state.stop.is_some()));
    Ok(())
}

proptest! {
    #[test]
    fn invariants_hold_after_every_bar(
        settings in arb_settings(),
        steps in prop::collection::vec(arb_step(), 1..200),
    ) {
        let params = StrategyParameters::try_from(&settings).unwrap();
        let mut bot = Bot::rsi_cross("NQ", &params).unwrap();
        let mut host = PaperBroker::new();
        let tick = Decimal::new(25, 2);
        let mut close = Decimal::new(20_000, 0);

        for (index, (step, interference)) in steps.into_iter().enumerate() {
            match interference {
                Interference::None => {}
                Interference::FillStop => {
                    if let Some(stop) = bot.state().stop {
                        host.fill_stop(stop.handle).unwrap();
                    }
                }
                Interference::ForceFlatten => host.force_flatten(),
            }

            close = (close + tick * Decimal::from(step)).max(tick);
            let bar = Bar::new(index as u64, close, tick).unwrap();
            let outcome = bot.on_bar(&bar, &mut host);

            prop_assert_eq!(outcome.bar_index, index as u64);
            if let Some(value) = outcome.indicator {
                prop_assert!(value >= Decimal::ZERO && value <= Decimal::ONE_HUNDRED);
            }
            check_invariants(&bot, &host)?;
        }
    }
}
