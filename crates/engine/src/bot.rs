// In crates/engine/src/bot.rs

use crate::reconciler::{self, Drift};
use crate::Result;
use core_types::{Action, Bar, OrderType, PositionSide, ProtectiveStop, Signal};
use execution::{Host, OrderIntent, OrderLifecycle};
use position::{expected_side, PositionPolicy, SingleUnitPolicy};
use strategies::rsi_cross::RsiCross;
use strategies::types::StrategyParameters;
use rust_decimal::Decimal;
use strategies::Strategy;

/// Everything that happened while processing one bar.
#[derive(Debug, Clone)]
pub struct BarOutcome {
    pub bar_index: u64,
    /// Set when the host position disagreed with the core's last known side.
    pub drift: Option<Drift>,
    /// Oscillator value after this bar, `None` during warm-up.
    pub indicator: Option<Decimal>,
    pub signal: Signal,
    pub action: Action,
    /// Re-sync operations first, then the orders for `action`.
    pub intents: Vec<OrderIntent>,
}

/// Snapshot of the bookkeeping the core carries between bars.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreState {
    pub last_known_side: PositionSide,
    pub stop: Option<ProtectiveStop>,
}

/// A single trading instance for one instrument and timeframe.
///
/// The bot is driven synchronously, one bar at a time. Within a bar the order
/// is fixed: re-sync with the host, update the indicator, detect the signal,
/// decide, then emit orders.
pub struct Bot {
    /// A unique identifier for this bot instance (e.g., "NQ_RsiCross_SingleUnitPolicy").
    pub id: String,
    strategy: Box<dyn Strategy + Send>,
    policy: Box<dyn PositionPolicy + Send>,
    lifecycle: OrderLifecycle,
    last_known_side: PositionSide,
    last_bar_index: Option<u64>,
}

impl Bot {
    /// Creates a new `Bot` instance.
    pub fn new(
        symbol: &str,
        strategy: Box<dyn Strategy + Send>,
        policy: Box<dyn PositionPolicy + Send>,
        stop_distance_ticks: u32,
    ) -> Self {
        let id = format!("{}_{}_{}", symbol, strategy.name(), policy.name());
        tracing::info!(id = %id, stop_distance_ticks, "Creating new bot instance.");

        Self {
            id,
            strategy,
            policy,
            lifecycle: OrderLifecycle::new(stop_distance_ticks),
            last_known_side: PositionSide::Flat,
            last_bar_index: None,
        }
    }

    /// The RSI breakout bot with the single-unit position policy.
    pub fn rsi_cross(symbol: &str, params: &StrategyParameters) -> Result<Self> {
        let strategy = RsiCross::new(params)?;
        Ok(Self::new(
            symbol,
            Box::new(strategy),
            Box::new(SingleUnitPolicy::new()),
            params.stop_distance_ticks,
        ))
    }

    pub fn state(&self) -> CoreState {
        CoreState {
            last_known_side: self.last_known_side,
            stop: self.lifecycle.stop().cloned(),
        }
    }

    /// Processes one bar end to end. Never fails: rejections and drift are
    /// handled here and reported in the outcome.
    pub fn on_bar(&mut self, bar: &Bar, host: &mut dyn Host) -> BarOutcome {
        if self.last_bar_index.is_some_and(|last| bar.index <= last) {
            tracing::warn!(bot_id = %self.id, index = bar.index, last = ?self.last_bar_index, "Bar received out of order.");
        }
        self.last_bar_index = Some(bar.index);

        // 1. Re-sync with the host's authoritative position.
        let reported = host.position();
        let (drift, mut intents) =
            reconciler::reconcile(self.last_known_side, reported, &mut self.lifecycle, bar, host);
        self.last_known_side = reported;

        // 2. Update the indicator and detect the signal.
        let signal = self.strategy.assess(bar);
        let indicator = self.strategy.indicator_value();
        tracing::debug!(bot_id = %self.id, index = bar.index, close = %bar.close, ?indicator, "Bar assessed.");

        // 3. Decide.
        let action = self.policy.decide(reported, signal);
        if signal != Signal::Hold {
            tracing::info!(bot_id = %self.id, ?signal, ?action, position = %reported, "Strategy generated a signal.");
        }

        // 4. Emit orders.
        let order_intents = self.lifecycle.apply(action, bar, host);
        if market_order_accepted(&order_intents) {
            self.last_known_side = expected_side(reported, action);
        } else if action != Action::Hold {
            tracing::warn!(bot_id = %self.id, ?action, "Order was rejected, keeping the host position.");
        }
        intents.extend(order_intents);

        BarOutcome {
            bar_index: bar.index,
            drift,
            indicator,
            signal,
            action,
            intents,
        }
    }
}

/// Whether the entry or exit market order of an action reached the host.
fn market_order_accepted(intents: &[OrderIntent]) -> bool {
    intents.iter().any(|intent| {
        matches!(
            intent,
            OrderIntent::Submitted { request, .. } if request.order_type == OrderType::Market
        )
    })
}
