//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// A single price level: a FIFO queue of resting orders sharing one price. Time priority within
// a level is admission order — the head of the queue is always the oldest resting order.
//
// | Name          | Description                                        | Key Methods       |
// |---------------|-----------------------------------------------------|------------------|
// | PriceLevel    | FIFO queue of orders at one price                    | add, remove, head |
//--------------------------------------------------------------------------------------------------

use std::collections::VecDeque;

use rust_decimal::Decimal;

use crate::types::{Order, OrderId};

/// A FIFO queue of orders resting at one price.
///
/// `aggregate_volume` and `length` are maintained as invariants on every mutation rather than
/// recomputed, matching the teacher's `orderbook::PriceLevel::total_volume` bookkeeping.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    pub price: Decimal,
    orders: VecDeque<Order>,
    pub aggregate_volume: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            aggregate_volume: Decimal::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn length(&self) -> usize {
        self.orders.len()
    }

    /// Appends an order at the tail (the most recent admission).
    pub fn add(&mut self, order: Order) {
        self.aggregate_volume += order.volume;
        self.orders.push_back(order);
    }

    /// The oldest resting order at this level, without removing it.
    pub fn head(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// The oldest resting order at this level, mutably.
    pub fn head_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    /// Removes the head order once it has been fully consumed. No-op on an empty level.
    pub fn pop_head(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Removes a specific order by id, wherever it sits in the queue (used for cancels).
    /// Idempotent: a no-op if `id` is not present.
    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.id == id)?;
        let order = self.orders.remove(pos)?;
        self.aggregate_volume -= order.volume;
        Some(order)
    }

    /// Records a fill against the head order without removing it from the queue — the caller
    /// removes it separately via `pop_head` once its volume reaches zero.
    pub fn record_fill(&mut self, volume: Decimal) {
        self.aggregate_volume -= volume;
    }
}
