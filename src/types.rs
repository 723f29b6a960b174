//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module defines the core data types used throughout the matching engine: orders, trades,
// and the small set of enums that describe how an order behaves.
//
// | Section   | Description                                            |
// |-----------|---------------------------------------------------------|
// | ENUMS     | Side, OrderKind.                                        |
// | STRUCTS   | Order, Trade.                                           |
// | Errors    | BookError — the validation/lookup error taxonomy.       |
//--------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique, strictly increasing identifier assigned by the book on admission.
pub type OrderId = u64;

/// The side of an order (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// The side a resting order must be on to oppose this one.
    pub fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// The kind of order, which determines its crossing and resting behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Unpriced taker. Crosses until filled or the opposing side is empty; never rests.
    Market,
    /// Priced. Crosses opposing liquidity up to its price, rests any remainder.
    Limit,
    /// Immediate-or-cancel limit: crosses like a limit order, but never rests.
    Ioc,
}

/// A resting or in-flight order.
///
/// Once admitted, every field but `volume` is immutable — `volume` only ever decreases, via
/// fills, until the order is unlinked from its price level and dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    /// Unset for market orders.
    pub price: Option<Decimal>,
    pub volume: Decimal,
    pub kind: OrderKind,
    /// Absent for simulator-originated liquidity.
    pub user: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A completed trade, appended to the tape and to both counterparties' trade lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: OrderId,
    /// Side of the taker (incoming order) in this trade.
    pub side: Side,
    pub price: Decimal,
    pub volume: Decimal,
    pub time: DateTime<Utc>,
    pub taker: Option<String>,
    pub maker: Option<String>,
}

/// Errors surfaced at the book's admission/cancellation boundary.
///
/// `EmptyMarket` and `NullMid` from spec §7 are not represented here: an exhausted market order
/// and an undefined mid-price are ordinary terminal states, not failures, so they are expressed
/// as plain return values (empty fills, `None` mid) rather than `Err` variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("invalid order side: {0}")]
    InvalidSide(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("order not found: {0}")]
    UnknownOrder(OrderId),
}
