// In crates/execution/src/lifecycle.rs

use crate::types::{OrderIntent, OrderStatus};
use crate::{Error, Host};
use core_types::{Action, Bar, OrderRequest, OrderSide, PositionSide, ProtectiveStop};
use rust_decimal::Decimal;

/// Turns position actions into orders and owns the single protective stop.
///
/// At most one stop handle is recorded at any time, and it is always on the
/// exit side of the position it protects. Only handles created here are ever
/// cancelled.
#[derive(Debug, Clone)]
pub struct OrderLifecycle {
    stop_distance_ticks: u32,
    stop: Option<ProtectiveStop>,
}

impl OrderLifecycle {
    pub fn new(stop_distance_ticks: u32) -> Self {
        Self {
            stop_distance_ticks,
            stop: None,
        }
    }

    /// The live protective stop, if one is recorded.
    pub fn stop(&self) -> Option<&ProtectiveStop> {
        self.stop.as_ref()
    }

    /// Carries out `action` against the host using `bar.close` as the entry reference.
    pub fn apply(&mut self, action: Action, bar: &Bar, host: &mut dyn Host) -> Vec<OrderIntent> {
        let mut intents = Vec::new();
        match action {
            Action::Hold => {}
            Action::Open(side) => self.open(side, bar, host, &mut intents),
            Action::Close(position) => self.close(position, host, &mut intents),
        }
        intents
    }

    /// Brings the recorded stop in line with the position the host reports.
    ///
    /// A stop that does not protect `position` is dropped, and cancelled only if
    /// the host still has it working. A stop the host no longer has working is
    /// forgotten. An open position left without a stop gets a new one at
    /// `bar.close` plus or minus the stop distance.
    pub fn resync(&mut self, position: PositionSide, bar: &Bar, host: &mut dyn Host) -> Vec<OrderIntent> {
        let mut intents = Vec::new();

        if let Some(stop) = &self.stop {
            if !stop.protects(position) {
                self.discard_stale(host, &mut intents);
            } else {
                match host.order_status(stop.handle) {
                    Ok(status) if status.is_working() => {}
                    Ok(status) => {
                        tracing::warn!(handle = %stop.handle, ?status, "Protective stop is no longer working at the host.");
                        self.stop = None;
                    }
                    Err(e) => {
                        tracing::warn!(handle = %stop.handle, error = %e, "Host cannot report the protective stop, clearing it.");
                        self.stop = None;
                    }
                }
            }
        }

        if !position.is_flat() && self.stop.is_none() {
            tracing::warn!(%position, close = %bar.close, "Open position has no protective stop, re-arming.");
            self.arm(position, bar, host, &mut intents);
        }

        intents
    }

    fn open(&mut self, side: OrderSide, bar: &Bar, host: &mut dyn Host, intents: &mut Vec<OrderIntent>) {
        if self.stop.is_some() {
            // Entries only happen from flat, so any recorded stop is left over.
            self.discard_stale(host, intents);
        }

        let label = match side {
            OrderSide::Buy => "Enter long position",
            OrderSide::Sell => "Enter short position",
        };
        if !submit(host, OrderRequest::market(side, label), intents) {
            return;
        }

        self.arm(PositionSide::opened_by(side), bar, host, intents);
    }

    fn close(&mut self, position: PositionSide, host: &mut dyn Host, intents: &mut Vec<OrderIntent>) {
        let Some(exit_side) = position.exit_side() else {
            return;
        };
        let label = match exit_side {
            OrderSide::Sell => "Exit long position (reversal exit signal)",
            OrderSide::Buy => "Exit short position (reversal exit signal)",
        };
        if !submit(host, OrderRequest::market(exit_side, label), intents) {
            // Position is still open at the host, so its stop stays in place.
            return;
        }

        if let Some(stop) = self.stop.take() {
            self.cancel(stop, host, intents);
        }
    }

    /// Places a protective stop for `position` and records its handle.
    fn arm(&mut self, position: PositionSide, bar: &Bar, host: &mut dyn Host, intents: &mut Vec<OrderIntent>) {
        let Some(side) = position.exit_side() else {
            return;
        };
        let distance = Decimal::from(self.stop_distance_ticks) * bar.tick_size;
        let (price, label) = match side {
            OrderSide::Sell => (bar.close - distance, "Catastrophic stop long exit"),
            OrderSide::Buy => (bar.close + distance, "Catastrophic stop short exit"),
        };

        let request = OrderRequest::stop(side, price, label);
        match host.submit(&request) {
            Ok(handle) => {
                tracing::info!(%handle, %side, %price, "Protective stop placed.");
                self.stop = Some(ProtectiveStop {
                    side,
                    price,
                    label: label.to_string(),
                    handle,
                });
                intents.push(OrderIntent::Submitted { request, handle });
            }
            Err(e) => {
                tracing::error!(error = %e, %side, %price, "Protective stop was rejected.");
                intents.push(OrderIntent::Rejected {
                    request,
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Drops a stop that no longer matches the host position.
    fn discard_stale(&mut self, host: &mut dyn Host, intents: &mut Vec<OrderIntent>) {
        let Some(stop) = self.stop.take() else {
            return;
        };
        match host.order_status(stop.handle) {
            Ok(OrderStatus::Working) => self.cancel(stop, host, intents),
            Ok(status) => {
                tracing::info!(handle = %stop.handle, ?status, "Stale stop is no longer working, clearing it.");
            }
            Err(e) => {
                tracing::warn!(handle = %stop.handle, error = %e, "Could not query stale stop, clearing it.");
            }
        }
    }

    /// Requests cancellation of `stop`. The handle is kept only if the host
    /// refused the request, so the next re-sync can try again.
    fn cancel(&mut self, stop: ProtectiveStop, host: &mut dyn Host, intents: &mut Vec<OrderIntent>) {
        let handle = stop.handle;
        match host.cancel(handle) {
            Ok(outcome) => {
                tracing::info!(%handle, ?outcome, "Protective stop cancelled.");
                intents.push(OrderIntent::CancelRequested { handle, outcome });
            }
            Err(e @ Error::UnknownOrder(_)) => {
                tracing::warn!(%handle, error = %e, "Host does not know the stop, clearing it.");
                intents.push(OrderIntent::CancelFailed {
                    handle,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                tracing::error!(%handle, error = %e, "Stop cancellation was refused.");
                intents.push(OrderIntent::CancelFailed {
                    handle,
                    reason: e.to_string(),
                });
                self.stop = Some(stop);
            }
        }
    }
}

/// Submits `request`, records the attempt and reports whether the host accepted it.
fn submit(host: &mut dyn Host, request: OrderRequest, intents: &mut Vec<OrderIntent>) -> bool {
    match host.submit(&request) {
        Ok(handle) => {
            tracing::info!(%handle, side = %request.side, label = %request.label, "Market order submitted.");
            intents.push(OrderIntent::Submitted { request, handle });
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, side = %request.side, label = %request.label, "Market order rejected.");
            intents.push(OrderIntent::Rejected {
                request,
                reason: e.to_string(),
            });
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CancelOutcome;
    use crate::PaperBroker;
    use core_types::{OrderHandle, OrderType};
    use rust_decimal_macros::dec;

    fn bar(close: Decimal) -> Bar {
        Bar::new(0, close, dec!(0.25)).unwrap()
    }

    #[test]
    fn open_long_places_entry_and_stop_below() {
        let mut host = PaperBroker::new();
        let mut lifecycle = OrderLifecycle::new(4);

        let intents = lifecycle.apply(Action::Open(OrderSide::Buy), &bar(dec!(100)), &mut host);

        assert_eq!(intents.len(), 2);
        let entry = intents[0].request().unwrap();
        assert_eq!((entry.side, entry.order_type), (OrderSide::Buy, OrderType::Market));
        let stop = intents[1].request().unwrap();
        assert_eq!(stop.side, OrderSide::Sell);
        assert_eq!(stop.order_type, OrderType::Stop { price: dec!(99) });

        let recorded = lifecycle.stop().unwrap();
        assert!(recorded.protects(PositionSide::Long));
        assert_eq!(host.order_status(recorded.handle), Ok(OrderStatus::Working));
    }

    #[test]
    fn open_short_places_stop_above() {
        let mut host = PaperBroker::new();
        let mut lifecycle = OrderLifecycle::new(4);
        lifecycle.apply(Action::Open(OrderSide::Sell), &bar(dec!(100)), &mut host);
        let stop = lifecycle.stop().unwrap();
        assert_eq!(stop.side, OrderSide::Buy);
        assert_eq!(stop.price, dec!(101));
    }

    #[test]
    fn close_flattens_and_cancels_the_stop() {
        let mut host = PaperBroker::new();
        let mut lifecycle = OrderLifecycle::new(4);
        lifecycle.apply(Action::Open(OrderSide::Buy), &bar(dec!(100)), &mut host);
        let handle = lifecycle.stop().unwrap().handle;

        let intents = lifecycle.apply(Action::Close(PositionSide::Long), &bar(dec!(98)), &mut host);

        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].request().unwrap().side, OrderSide::Sell);
        assert_eq!(
            intents[1],
            OrderIntent::CancelRequested { handle, outcome: CancelOutcome::Cancelled }
        );
        assert!(lifecycle.stop().is_none());
        assert_eq!(host.position(), PositionSide::Flat);
        assert_eq!(host.working_orders().count(), 0);
    }

    #[test]
    fn hold_emits_nothing() {
        let mut host = PaperBroker::new();
        let mut lifecycle = OrderLifecycle::new(4);
        assert!(lifecycle.apply(Action::Hold, &bar(dec!(100)), &mut host).is_empty());
    }

    #[test]
    fn rejected_entry_places_no_stop() {
        let mut host = PaperBroker::new();
        host.reject_next("insufficient margin");
        let mut lifecycle = OrderLifecycle::new(4);

        let intents = lifecycle.apply(Action::Open(OrderSide::Buy), &bar(dec!(100)), &mut host);

        assert!(matches!(intents.as_slice(), [OrderIntent::Rejected { .. }]));
        assert!(lifecycle.stop().is_none());
        assert_eq!(host.position(), PositionSide::Flat);
    }

    #[test]
    fn rejected_close_keeps_the_stop() {
        let mut host = PaperBroker::new();
        let mut lifecycle = OrderLifecycle::new(4);
        lifecycle.apply(Action::Open(OrderSide::Buy), &bar(dec!(100)), &mut host);
        host.reject_next("market closed");

        let intents = lifecycle.apply(Action::Close(PositionSide::Long), &bar(dec!(98)), &mut host);

        assert!(matches!(intents.as_slice(), [OrderIntent::Rejected { .. }]));
        assert!(lifecycle.stop().is_some());
        assert_eq!(host.position(), PositionSide::Long);
    }

    #[test]
    fn resync_clears_filled_stop_without_cancelling() {
        let mut host = PaperBroker::new();
        let mut lifecycle = OrderLifecycle::new(4);
        lifecycle.apply(Action::Open(OrderSide::Buy), &bar(dec!(100)), &mut host);
        host.fill_stop(lifecycle.stop().unwrap().handle).unwrap();

        let intents = lifecycle.resync(host.position(), &bar(dec!(98)), &mut host);

        assert!(intents.is_empty());
        assert!(lifecycle.stop().is_none());
        assert_eq!(host.cancel_requests(), 0);
    }

    #[test]
    fn resync_cancels_orphaned_working_stop() {
        let mut host = PaperBroker::new();
        let mut lifecycle = OrderLifecycle::new(4);
        lifecycle.apply(Action::Open(OrderSide::Buy), &bar(dec!(100)), &mut host);
        let handle = lifecycle.stop().unwrap().handle;
        host.set_position(PositionSide::Flat);

        let intents = lifecycle.resync(PositionSide::Flat, &bar(dec!(98)), &mut host);

        assert_eq!(
            intents,
            vec![OrderIntent::CancelRequested { handle, outcome: CancelOutcome::Cancelled }]
        );
        assert!(lifecycle.stop().is_none());
    }

    #[test]
    fn resync_rearms_missing_stop() {
        let mut host = PaperBroker::new();
        let mut lifecycle = OrderLifecycle::new(4);
        host.set_position(PositionSide::Short);

        let intents = lifecycle.resync(PositionSide::Short, &bar(dec!(50)), &mut host);

        assert_eq!(intents.len(), 1);
        let stop = lifecycle.stop().unwrap();
        assert_eq!(stop.side, OrderSide::Buy);
        assert_eq!(stop.price, dec!(51));
    }

    /// Wraps the paper host and misbehaves on demand.
    #[derive(Default)]
    struct UnreliableHost {
        inner: PaperBroker,
        /// Cancels to refuse before passing them through.
        refused_cancels: usize,
        /// Answer every cancel and status query with `UnknownOrder`.
        forgetful: bool,
    }

    impl Host for UnreliableHost {
        fn name(&self) -> &'static str {
            "UnreliableHost"
        }
        fn position(&self) -> PositionSide {
            self.inner.position()
        }
        fn submit(&mut self, request: &OrderRequest) -> crate::Result<OrderHandle> {
            self.inner.submit(request)
        }
        fn cancel(&mut self, handle: OrderHandle) -> crate::Result<CancelOutcome> {
            if self.forgetful {
                return Err(Error::UnknownOrder(handle));
            }
            if self.refused_cancels > 0 {
                self.refused_cancels -= 1;
                return Err(Error::Rejected { reason: "cancel refused".into() });
            }
            self.inner.cancel(handle)
        }
        fn order_status(&self, handle: OrderHandle) -> crate::Result<OrderStatus> {
            if self.forgetful {
                return Err(Error::UnknownOrder(handle));
            }
            self.inner.order_status(handle)
        }
    }

    #[test]
    fn unknown_stop_handle_is_cleared_on_close() {
        let mut host = UnreliableHost::default();
        let mut lifecycle = OrderLifecycle::new(4);
        lifecycle.apply(Action::Open(OrderSide::Buy), &bar(dec!(100)), &mut host);
        host.forgetful = true;

        let intents = lifecycle.apply(Action::Close(PositionSide::Long), &bar(dec!(98)), &mut host);

        assert!(matches!(intents[1], OrderIntent::CancelFailed { .. }));
        assert!(lifecycle.stop().is_none());
    }

    #[test]
    fn stop_unknown_to_host_is_rearmed_on_resync() {
        let mut host = UnreliableHost::default();
        let mut lifecycle = OrderLifecycle::new(4);
        lifecycle.apply(Action::Open(OrderSide::Buy), &bar(dec!(100)), &mut host);
        let forgotten = lifecycle.stop().unwrap().handle;
        host.forgetful = true;

        let intents = lifecycle.resync(PositionSide::Long, &bar(dec!(102)), &mut host);

        assert_eq!(intents.len(), 1);
        let stop = lifecycle.stop().unwrap();
        assert_ne!(stop.handle, forgotten);
        assert_eq!(stop.side, OrderSide::Sell);
        assert_eq!(stop.price, dec!(101));
    }

    #[test]
    fn refused_cancel_is_retried_on_next_resync() {
        let mut host = UnreliableHost {
            refused_cancels: 1,
            ..UnreliableHost::default()
        };
        let mut lifecycle = OrderLifecycle::new(4);
        lifecycle.apply(Action::Open(OrderSide::Buy), &bar(dec!(100)), &mut host);
        let handle = lifecycle.stop().unwrap().handle;

        let intents = lifecycle.apply(Action::Close(PositionSide::Long), &bar(dec!(98)), &mut host);

        assert!(matches!(intents[1], OrderIntent::CancelFailed { .. }));
        assert_eq!(lifecycle.stop().map(|s| s.handle), Some(handle));
        assert_eq!(host.position(), PositionSide::Flat);

        let retry = lifecycle.resync(PositionSide::Flat, &bar(dec!(97)), &mut host);

        assert_eq!(
            retry,
            vec![OrderIntent::CancelRequested { handle, outcome: CancelOutcome::Cancelled }]
        );
        assert!(lifecycle.stop().is_none());
        assert_eq!(host.inner.order_status(handle), Ok(OrderStatus::Cancelled));
    }
}
