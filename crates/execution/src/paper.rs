// In crates/execution/src/paper.rs

use crate::types::{CancelOutcome, OrderStatus};
use crate::{Error, Host, Result};
use core_types::{OrderHandle, OrderRequest, OrderSide, OrderType, PositionSide};
use std::collections::BTreeMap;

/// The largest net position the paper host accepts, either side.
const MAX_OPEN_POSITION: i64 = 1;

#[derive(Debug, Clone)]
pub struct PaperOrder {
    pub request: OrderRequest,
    pub status: OrderStatus,
}

/// An in-memory host used for paper runs and tests.
///
/// Market orders fill immediately at whatever the market is; stop orders rest
/// as `Working` until cancelled or explicitly filled through `fill_stop`.
/// There is no price, fee or slippage model.
#[derive(Debug, Default)]
pub struct PaperBroker {
    net_position: i64,
    next_handle: u64,
    orders: BTreeMap<OrderHandle, PaperOrder>,
    /// Accepted submissions to let through before rejecting, and the reason.
    pending_rejection: Option<(usize, String)>,
    cancel_requests: usize,
}

impl PaperBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `submit` call fail with `reason`.
    pub fn reject_next(&mut self, reason: impl Into<String>) {
        self.reject_after(0, reason);
    }

    /// Lets `skip` submissions through, then rejects the following one.
    pub fn reject_after(&mut self, skip: usize, reason: impl Into<String>) {
        self.pending_rejection = Some((skip, reason.into()));
    }

    /// Fills a working stop order, moving the position accordingly.
    pub fn fill_stop(&mut self, handle: OrderHandle) -> Result<()> {
        let order = self.orders.get_mut(&handle).ok_or(Error::UnknownOrder(handle))?;
        if !order.status.is_working() {
            return Err(Error::Rejected {
                reason: format!("order {handle} is not working"),
            });
        }
        order.status = OrderStatus::Filled;
        self.net_position += signed_quantity(&order.request);
        tracing::info!(%handle, position = %self.position(), "Paper stop filled.");
        Ok(())
    }

    /// Closes the open position and cancels every working order, as an
    /// end-of-session policy would.
    pub fn force_flatten(&mut self) {
        let mut cancelled = 0;
        for order in self.orders.values_mut().filter(|o| o.status.is_working()) {
            order.status = OrderStatus::Cancelled;
            cancelled += 1;
        }
        tracing::info!(
            previous = %self.position(),
            cancelled,
            "Paper host forced the position flat."
        );
        self.net_position = 0;
    }

    /// Overwrites the position without touching any order.
    pub fn set_position(&mut self, side: PositionSide) {
        self.net_position = side.net_quantity();
    }

    pub fn net_position(&self) -> i64 {
        self.net_position
    }

    pub fn order(&self, handle: OrderHandle) -> Option<&PaperOrder> {
        self.orders.get(&handle)
    }

    pub fn working_orders(&self) -> impl Iterator<Item = (&OrderHandle, &PaperOrder)> {
        self.orders.iter().filter(|(_, o)| o.status.is_working())
    }

    /// Number of `cancel` calls received, accepted or not.
    pub fn cancel_requests(&self) -> usize {
        self.cancel_requests
    }
}

fn signed_quantity(request: &OrderRequest) -> i64 {
    let quantity = i64::from(request.quantity);
    match request.side {
        OrderSide::Buy => quantity,
        OrderSide::Sell => -quantity,
    }
}

impl Host for PaperBroker {
    fn name(&self) -> &'static str {
        "PaperBroker"
    }

    fn position(&self) -> PositionSide {
        PositionSide::from_net_quantity(self.net_position)
    }

    fn submit(&mut self, request: &OrderRequest) -> Result<OrderHandle> {
        match self.pending_rejection.take() {
            Some((0, reason)) => return Err(Error::Rejected { reason }),
            Some((skip, reason)) => self.pending_rejection = Some((skip - 1, reason)),
            None => {}
        }

        let status = match request.order_type {
            OrderType::Market => {
                let resulting = self.net_position + signed_quantity(request);
                if resulting.abs() > MAX_OPEN_POSITION {
                    return Err(Error::Rejected {
                        reason: format!(
                            "order would leave a position of {resulting}, limit is {MAX_OPEN_POSITION}"
                        ),
                    });
                }
                self.net_position = resulting;
                OrderStatus::Filled
            }
            OrderType::Stop { .. } => OrderStatus::Working,
        };

        self.next_handle += 1;
        let handle = OrderHandle(self.next_handle);
        self.orders.insert(
            handle,
            PaperOrder {
                request: request.clone(),
                status,
            },
        );
        Ok(handle)
    }

    fn cancel(&mut self, handle: OrderHandle) -> Result<CancelOutcome> {
        self.cancel_requests += 1;
        let order = self.orders.get_mut(&handle).ok_or(Error::UnknownOrder(handle))?;
        if order.status.is_working() {
            order.status = OrderStatus::Cancelled;
            Ok(CancelOutcome::Cancelled)
        } else {
            Ok(CancelOutcome::AlreadyInactive)
        }
    }

    fn order_status(&self, handle: OrderHandle) -> Result<OrderStatus> {
        self.orders
            .get(&handle)
            .map(|o| o.status)
            .ok_or(Error::UnknownOrder(handle))
    }
}
