//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// One side of the book (all resting bids, or all resting asks): an ordered map of price level,
// plus an id index giving O(1) lookup for cancellation by order id.
//
// | Name          | Description                                       | Key Methods        |
// |---------------|-----------------------------------------------------|-------------------|
// | SideLadder    | All resting liquidity on one side                   | add, remove, best_price, match_against |
//--------------------------------------------------------------------------------------------------

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::price_level::PriceLevel;
use crate::types::{Order, OrderId, Side};

/// The outcome of consuming one step of liquidity against a resting order.
pub struct MatchStep {
    /// Price at which the trade occurred (the resting order's price).
    pub trade_price: Decimal,
    /// Volume exchanged — `min(incoming.volume, resting.volume)`.
    pub trade_volume: Decimal,
    /// The resting (maker) order as it stood before this fill (for ledger/tape bookkeeping).
    pub maker: Order,
    /// Whether the maker order was fully consumed and removed from the ladder.
    pub maker_filled: bool,
}

/// All resting liquidity on one side of the book, ordered by price.
#[derive(Debug)]
pub struct SideLadder {
    side: Side,
    levels: BTreeMap<Decimal, PriceLevel>,
    index: HashMap<OrderId, Decimal>,
    pub total_volume: Decimal,
    pub num_orders: usize,
}

impl SideLadder {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            index: HashMap::new(),
            total_volume: Decimal::ZERO,
            num_orders: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Adds an order to this ladder, reinserting (remove-then-add) if its id already rests here.
    pub fn add(&mut self, order: Order) {
        if self.index.contains_key(&order.id) {
            self.remove(order.id);
        }
        let price = order
            .price
            .expect("only priced orders are added to a ladder");
        self.total_volume += order.volume;
        self.num_orders += 1;
        self.index.insert(order.id, price);
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .add(order);
    }

    /// Removes an order by id. Returns `true` if it was resting here, `false` otherwise.
    pub fn remove(&mut self, id: OrderId) -> bool {
        let Some(price) = self.index.remove(&id) else {
            return false;
        };
        let Some(level) = self.levels.get_mut(&price) else {
            return false;
        };
        if let Some(order) = level.remove(id) {
            self.total_volume -= order.volume;
            self.num_orders -= 1;
            if level.is_empty() {
                self.levels.remove(&price);
            }
            true
        } else {
            false
        }
    }

    /// Best price on this side: max for bids, min for asks.
    pub fn best_price(&self) -> Option<Decimal> {
        match self.side {
            Side::Bid => self.levels.keys().next_back().copied(),
            Side::Ask => self.levels.keys().next().copied(),
        }
    }

    fn best_level_mut(&mut self) -> Option<&mut PriceLevel> {
        let price = self.best_price()?;
        self.levels.get_mut(&price)
    }

    /// The oldest order at the best price — the next to be matched.
    pub fn head(&self) -> Option<&Order> {
        let price = self.best_price()?;
        self.levels.get(&price)?.head()
    }

    /// `(price, aggregate_volume)` for every non-empty level, in ascending price order.
    pub fn iter(&self) -> impl Iterator<Item = (Decimal, Decimal)> + '_ {
        self.levels.iter().map(|(price, level)| (*price, level.aggregate_volume))
    }

    /// Consumes one step of liquidity against `incoming`, mutating its volume in place and
    /// returning the trade details. Panics if the ladder is empty — callers must check
    /// `best_price()`/`head()` first, matching the invariant that this is only called when a
    /// crossing match is already known to exist.
    pub fn match_against(&mut self, incoming: &mut Order) -> MatchStep {
        let price = self
            .best_price()
            .expect("match_against called on an empty ladder");
        let level = self
            .best_level_mut()
            .expect("best_price just returned Some");
        let maker_before = level.head().cloned().expect("level with a price is non-empty");
        let trade_volume = Decimal::min(incoming.volume, maker_before.volume);

        incoming.volume -= trade_volume;
        level.record_fill(trade_volume);

        let maker_filled = {
            let maker = level.head_mut().expect("head exists");
            maker.volume -= trade_volume;
            maker.volume.is_zero()
        };

        let maker_after = if maker_filled {
            let order = level.pop_head().expect("head exists");
            self.index.remove(&order.id);
            self.num_orders -= 1;
            if level.is_empty() {
                self.levels.remove(&price);
            }
            order
        } else {
            level.head().cloned().expect("head still resting")
        };

        self.total_volume -= trade_volume;

        MatchStep {
            trade_price: price,
            trade_volume,
            maker: maker_after,
            maker_filled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderKind;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn order(id: OrderId, side: Side, price: Decimal, volume: Decimal) -> Order {
        Order {
            id,
            side,
            price: Some(price),
            volume,
            kind: OrderKind::Limit,
            user: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn best_price_bid_is_max_ask_is_min() {
        let mut bids = SideLadder::new(Side::Bid);
        bids.add(order(1, Side::Bid, dec!(100.0), dec!(1.0)));
        bids.add(order(2, Side::Bid, dec!(101.0), dec!(1.0)));
        assert_eq!(bids.best_price(), Some(dec!(101.0)));

        let mut asks = SideLadder::new(Side::Ask);
        asks.add(order(3, Side::Ask, dec!(102.0), dec!(1.0)));
        asks.add(order(4, Side::Ask, dec!(101.5), dec!(1.0)));
        assert_eq!(asks.best_price(), Some(dec!(101.5)));
    }

    #[test]
    fn reinsert_semantics_on_duplicate_id() {
        let mut bids = SideLadder::new(Side::Bid);
        bids.add(order(1, Side::Bid, dec!(100.0), dec!(1.0)));
        bids.add(order(1, Side::Bid, dec!(101.0), dec!(5.0)));
        assert_eq!(bids.num_orders, 1);
        assert_eq!(bids.best_price(), Some(dec!(101.0)));
        assert_eq!(bids.total_volume, dec!(5.0));
    }

    #[test]
    fn remove_drops_empty_level() {
        let mut bids = SideLadder::new(Side::Bid);
        bids.add(order(1, Side::Bid, dec!(100.0), dec!(1.0)));
        assert!(bids.remove(1));
        assert_eq!(bids.depth(), 0);
        assert!(!bids.remove(1));
    }

    #[test]
    fn match_against_partial_fill_keeps_maker_resting() {
        let mut asks = SideLadder::new(Side::Ask);
        asks.add(order(1, Side::Ask, dec!(100.1), dec!(5.0)));
        let mut incoming = order(2, Side::Bid, dec!(0), dec!(3.0));
        let step = asks.match_against(&mut incoming);
        assert_eq!(step.trade_volume, dec!(3.0));
        assert_eq!(step.trade_price, dec!(100.1));
        assert!(!step.maker_filled);
        assert_eq!(incoming.volume, dec!(0.0));
        assert_eq!(asks.total_volume, dec!(2.0));
        assert_eq!(asks.head().unwrap().volume, dec!(2.0));
    }

    #[test]
    fn match_against_full_fill_removes_maker() {
        let mut asks = SideLadder::new(Side::Ask);
        asks.add(order(1, Side::Ask, dec!(100.1), dec!(3.0)));
        let mut incoming = order(2, Side::Bid, dec!(0), dec!(7.0));
        let step = asks.match_against(&mut incoming);
        assert_eq!(step.trade_volume, dec!(3.0));
        assert!(step.maker_filled);
        assert_eq!(incoming.volume, dec!(4.0));
        assert!(asks.is_empty());
    }

    #[test]
    fn price_time_priority_within_level() {
        let mut asks = SideLadder::new(Side::Ask);
        asks.add(order(1, Side::Ask, dec!(100.0), dec!(4.0)));
        asks.add(order(2, Side::Ask, dec!(100.0), dec!(4.0)));
        let mut incoming = order(3, Side::Bid, dec!(0), dec!(5.0));
        let step = asks.match_against(&mut incoming);
        assert_eq!(step.maker.id, 1);
        assert!(step.maker_filled);
        // Second order at the level still rests with full volume.
        assert_eq!(asks.head().unwrap().id, 2);
        assert_eq!(asks.head().unwrap().volume, dec!(4.0));
    }
}
