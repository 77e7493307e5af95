// In crates/core-types/src/types.rs

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single closed price bar delivered by the host.
///
/// Bars are strictly ordered by `index` and immutable once delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Ordinal position of the bar in the feed.
    pub index: u64,
    pub close: Decimal,
    /// Minimum price increment of the instrument. Constant for a run.
    pub tick_size: Decimal,
}

impl Bar {
    pub fn new(index: u64, close: Decimal, tick_size: Decimal) -> Result<Self> {
        if tick_size <= Decimal::ZERO {
            return Err(Error::InvalidTickSize(tick_size));
        }
        if close < Decimal::ZERO {
            return Err(Error::InvalidBar {
                index,
                reason: format!("negative close {close}"),
            });
        }
        Ok(Self { index, close, tick_size })
    }
}

/// The side of an order sent to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

/// The net position held at the host. Never more than one unit either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PositionSide {
    #[default]
    Flat,
    Long,
    Short,
}

impl PositionSide {
    /// Maps a signed net quantity onto a side. Anything beyond one unit keeps its sign.
    pub fn from_net_quantity(quantity: i64) -> Self {
        match quantity.signum() {
            1 => PositionSide::Long,
            -1 => PositionSide::Short,
            _ => PositionSide::Flat,
        }
    }

    pub fn net_quantity(self) -> i64 {
        match self {
            PositionSide::Flat => 0,
            PositionSide::Long => 1,
            PositionSide::Short => -1,
        }
    }

    /// The order side that flattens this position, if any.
    pub fn exit_side(self) -> Option<OrderSide> {
        match self {
            PositionSide::Flat => None,
            PositionSide::Long => Some(OrderSide::Sell),
            PositionSide::Short => Some(OrderSide::Buy),
        }
    }

    /// The position an entry order of `side` opens from flat.
    pub fn opened_by(side: OrderSide) -> Self {
        match side {
            OrderSide::Buy => PositionSide::Long,
            OrderSide::Sell => PositionSide::Short,
        }
    }

    pub fn is_flat(self) -> bool {
        self == PositionSide::Flat
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSide::Flat => write!(f, "flat"),
            PositionSide::Long => write!(f, "long"),
            PositionSide::Short => write!(f, "short"),
        }
    }
}

/// The discrete output of the signal detector. Exactly one per bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Signal {
    /// No crossing on this bar.
    #[default]
    Hold,
    /// The oscillator crossed upward through the buy trigger level.
    Buy,
    /// The oscillator crossed downward through the sell trigger level.
    Sell,
}

/// What the position state machine decided to do on a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Hold,
    /// Open one unit from flat with an entry order of this side.
    Open(OrderSide),
    /// Flatten the given open position.
    Close(PositionSide),
}

/// Host-assigned identifier of a submitted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderHandle(pub u64);

impl fmt::Display for OrderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Stop { price: Decimal },
}

/// An order intent handed to the host for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub side: OrderSide,
    pub quantity: u32,
    pub order_type: OrderType,
    pub label: String,
}

impl OrderRequest {
    pub fn market(side: OrderSide, label: impl Into<String>) -> Self {
        Self {
            side,
            quantity: 1,
            order_type: OrderType::Market,
            label: label.into(),
        }
    }

    pub fn stop(side: OrderSide, price: Decimal, label: impl Into<String>) -> Self {
        Self {
            side,
            quantity: 1,
            order_type: OrderType::Stop { price },
            label: label.into(),
        }
    }
}

/// The single live stop order protecting an open position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectiveStop {
    /// Always the exit side of the position it protects.
    pub side: OrderSide,
    pub price: Decimal,
    pub label: String,
    pub handle: OrderHandle,
}

impl ProtectiveStop {
    /// Whether this stop is on the correct side to protect `position`.
    pub fn protects(&self, position: PositionSide) -> bool {
        position.exit_side() == Some(self.side)
    }
}
