//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The book: two side ladders, the admission/matching state machine, the trade tape, and the
// per-user account ledger (trades, positions, P&L — all sharing one time axis). This is the single
// entry point every mutation passes through; the service boundary only ever calls `submit` and
// `cancel` on an instance of this type.
//
// | Name          | Description                                           | Key Methods          |
// |---------------|--------------------------------------------------------|----------------------|
// | OrderRequest  | Raw admission payload before validation                 | —                     |
// | DepthSnapshot | Visualization-ready cumulative depth at `depth` levels  | —                     |
// | Book          | Matching engine + ledger                                | submit, cancel, depth_snapshot |
//--------------------------------------------------------------------------------------------------

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::ladder::SideLadder;
use crate::types::{BookError, Order, OrderId, OrderKind, Side, Trade};

/// Quantizes `value` to the nearest multiple of `tick`. A zero tick disables quantization.
fn quantize(value: Decimal, tick: Decimal) -> Decimal {
    if tick.is_zero() {
        return value;
    }
    (value / tick).round() * tick
}

/// Raw admission payload, shaped like the JSON body of `POST /add_order` — fields are optional so
/// the book can distinguish "key absent" (`MissingField`) from "key present with an invalid value"
/// (`InvalidSide`), the same distinction the Python original draws on a plain dict.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    pub side: Option<String>,
    pub price: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub kind: Option<String>,
    pub user: Option<String>,
}

/// One side of a visualization snapshot: `(price, cumulative_volume)` pairs, nearest-to-mid first.
pub type DepthSide = Vec<(Decimal, Decimal)>;

/// Cumulative depth either side of the mid price, for `GET /orderbook`.
#[derive(Debug, Clone)]
pub struct DepthSnapshot {
    pub bids: DepthSide,
    pub asks: DepthSide,
}

/// The book: matching engine, tape, and account ledger for one instrument.
pub struct Book {
    bids: SideLadder,
    asks: SideLadder,
    event_counter: u64,
    tick_size: Decimal,
    max_order_volume: Decimal,
    tape: VecDeque<Trade>,
    user_trades: HashMap<String, Vec<Trade>>,
    user_positions: HashMap<String, Vec<(DateTime<Utc>, Decimal)>>,
    user_pnls: HashMap<String, Vec<(DateTime<Utc>, Decimal)>>,
    realized_pnl: HashMap<String, Decimal>,
    mid_prices: Vec<(DateTime<Utc>, Decimal)>,
}

impl Book {
    pub fn new(tick_size: Decimal, max_order_volume: Decimal) -> Self {
        Self {
            bids: SideLadder::new(Side::Bid),
            asks: SideLadder::new(Side::Ask),
            event_counter: 0,
            tick_size,
            max_order_volume,
            tape: VecDeque::new(),
            user_trades: HashMap::new(),
            user_positions: HashMap::new(),
            user_pnls: HashMap::new(),
            realized_pnl: HashMap::new(),
            mid_prices: Vec::new(),
        }
    }

    fn ladder(&self, side: Side) -> &SideLadder {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn ladder_mut(&mut self, side: Side) -> &mut SideLadder {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Validates and admits an order, dispatching by kind. Returns the assigned id.
    pub fn submit(&mut self, req: OrderRequest) -> Result<OrderId, BookError> {
        let side_str = req.side.ok_or(BookError::MissingField("side"))?;
        let side = match side_str.to_lowercase().as_str() {
            "bid" => Side::Bid,
            "ask" => Side::Ask,
            other => return Err(BookError::InvalidSide(other.to_string())),
        };
        let kind_str = req.kind.ok_or(BookError::MissingField("kind"))?;
        let kind = match kind_str.to_lowercase().as_str() {
            "market" => OrderKind::Market,
            "limit" => OrderKind::Limit,
            "ioc" => OrderKind::Ioc,
            // No dedicated taxonomy entry for a bad kind string; fold it into the same
            // "required field effectively absent" bucket as a missing key.
            _ => return Err(BookError::MissingField("kind")),
        };
        let raw_volume = req.volume.ok_or(BookError::MissingField("volume"))?;

        let volume = quantize(
            raw_volume.clamp(Decimal::ZERO, self.max_order_volume),
            self.tick_size,
        );
        // Admission prices are taken as submitted, not rounded to the tick: the original
        // `orderbook.py::to_order_object` never quantizes an incoming price either, and rounding
        // one up here (`(1005.5).round()` banker's-rounds to `1006`) can push a price across a
        // resting level it was never meant to cross. Only volume is quantized to the tick.
        let price = match kind {
            OrderKind::Market => None,
            _ => Some(req.price.ok_or(BookError::MissingField("price"))?),
        };

        self.event_counter += 1;
        let id = self.event_counter;
        let order = Order {
            id,
            side,
            price,
            volume,
            kind,
            user: req.user,
            timestamp: Utc::now(),
        };
        debug!(order_id = id, ?side, ?kind, %volume, "order admitted");

        match kind {
            OrderKind::Market => self.match_market(order),
            OrderKind::Limit => {
                let remainder = self.match_crossing(order);
                if !remainder.volume.is_zero() {
                    self.ladder_mut(remainder.side).add(remainder);
                }
            }
            OrderKind::Ioc => {
                self.match_crossing(order);
            }
        }

        Ok(id)
    }

    /// Pure taker: consumes opposing liquidity until filled or the opposing ladder is empty.
    /// Any residual volume is discarded — an empty opposing side is a terminal state, not a fault.
    fn match_market(&mut self, mut order: Order) {
        let opposite = order.side.opposite();
        while !order.volume.is_zero() {
            if self.ladder(opposite).best_price().is_none() {
                break;
            }
            let step = self.ladder_mut(opposite).match_against(&mut order);
            self.post_trade(
                order.side,
                step.trade_price,
                step.trade_volume,
                order.user.clone(),
                step.maker.user.clone(),
            );
        }
    }

    /// Shared crossing loop for limit and IOC orders: consumes opposing liquidity while the
    /// incoming price crosses the opposing best price. Returns the order with its residual
    /// volume — the caller decides whether that residual rests (limit) or is dropped (IOC).
    fn match_crossing(&mut self, mut order: Order) -> Order {
        let opposite = order.side.opposite();
        loop {
            if order.volume.is_zero() {
                break;
            }
            let Some(best) = self.ladder(opposite).best_price() else {
                break;
            };
            let crosses = match order.side {
                Side::Bid => order.price.is_some_and(|p| p >= best),
                Side::Ask => order.price.is_some_and(|p| p <= best),
            };
            if !crosses {
                break;
            }
            let step = self.ladder_mut(opposite).match_against(&mut order);
            self.post_trade(
                order.side,
                step.trade_price,
                step.trade_volume,
                order.user.clone(),
                step.maker.user.clone(),
            );
        }
        order
    }

    /// Attempts removal from both ladders. Idempotent: a cancel for an already-filled or unknown
    /// id simply returns `false` — this never produces a tape or ledger entry.
    pub fn cancel(&mut self, id: OrderId) -> bool {
        let removed_bid = self.bids.remove(id);
        let removed_ask = self.asks.remove(id);
        removed_bid || removed_ask
    }

    fn ensure_user(&mut self, user: &str, ts: DateTime<Utc>) {
        self.user_positions
            .entry(user.to_string())
            .or_insert_with(|| vec![(ts, Decimal::ZERO)]);
        self.user_pnls
            .entry(user.to_string())
            .or_insert_with(|| vec![(ts, Decimal::ZERO)]);
        self.user_trades.entry(user.to_string()).or_default();
        self.realized_pnl.entry(user.to_string()).or_insert(Decimal::ZERO);
    }

    fn current_position(&self, user: &str) -> Decimal {
        self.user_positions
            .get(user)
            .and_then(|series| series.last())
            .map(|(_, p)| *p)
            .unwrap_or(Decimal::ZERO)
    }

    /// Appends a trade to the tape, updates both counterparties' trade lists, advances every
    /// known user's position and P&L series by one sample (unchanged for bystanders, so all
    /// series share one time axis), and records a mid-price sample.
    fn post_trade(
        &mut self,
        taker_side: Side,
        price: Decimal,
        volume: Decimal,
        taker: Option<String>,
        maker: Option<String>,
    ) {
        self.event_counter += 1;
        let id = self.event_counter;
        let timestamp = Utc::now();
        let trade = Trade {
            id,
            side: taker_side,
            price,
            volume,
            time: timestamp,
            taker: taker.clone(),
            maker: maker.clone(),
        };
        self.tape.push_back(trade.clone());
        info!(trade_id = id, %price, %volume, ?taker_side, "trade printed");

        if let Some(u) = &taker {
            self.ensure_user(u, timestamp);
            self.user_trades.get_mut(u).unwrap().push(trade.clone());
            let sign = if taker_side == Side::Ask { Decimal::ONE } else { -Decimal::ONE };
            *self.realized_pnl.get_mut(u).unwrap() += sign * price * volume;
        }
        if let Some(u) = &maker {
            self.ensure_user(u, timestamp);
            self.user_trades.get_mut(u).unwrap().push(trade.clone());
            let maker_side = taker_side.opposite();
            let sign = if maker_side == Side::Ask { Decimal::ONE } else { -Decimal::ONE };
            *self.realized_pnl.get_mut(u).unwrap() += sign * price * volume;
        }

        let users: Vec<String> = self.user_positions.keys().cloned().collect();
        for user in &users {
            let mut delta = Decimal::ZERO;
            if taker.as_deref() == Some(user.as_str()) {
                delta += if taker_side == Side::Bid { volume } else { -volume };
            }
            if maker.as_deref() == Some(user.as_str()) {
                delta += if taker_side == Side::Bid { -volume } else { volume };
            }
            let new_position = self.current_position(user) + delta;
            self.user_positions.get_mut(user).unwrap().push((timestamp, new_position));
        }

        let mid = self.mid_price();
        for user in &users {
            let position = self.current_position(user);
            let realized = *self.realized_pnl.get(user).unwrap();
            // When mid is undefined, an open position's unrealized contribution is undefined too;
            // report the realized component alone rather than propagate an error (see DESIGN.md).
            let pnl = match mid {
                Some(m) => realized + position * m,
                None => realized,
            };
            self.user_pnls.get_mut(user).unwrap().push((timestamp, pnl));
        }

        if let Some(m) = mid {
            self.mid_prices.push((timestamp, m));
        }
    }

    /// `(best_bid + best_ask) / 2`, quantized to 0.01 — `None` when either side is empty.
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.bids.best_price(), self.asks.best_price()) {
            (Some(b), Some(a)) => Some(quantize((b + a) / Decimal::TWO, Decimal::new(1, 2))),
            _ => None,
        }
    }

    /// Cumulative bid/ask volume at `depth` price steps either side of the current mid.
    pub fn depth_snapshot(&self, depth: usize) -> DepthSnapshot {
        let anchor = self
            .mid_price()
            .unwrap_or_else(|| self.bids.best_price().or_else(|| self.asks.best_price()).unwrap_or(Decimal::ZERO));
        let anchor = quantize(anchor, self.tick_size);

        let bid_levels: Vec<(Decimal, Decimal)> = self.bids.iter().collect();
        let ask_levels: Vec<(Decimal, Decimal)> = self.asks.iter().collect();

        let mut bids = Vec::with_capacity(depth);
        for i in 1..=depth {
            let level_price = quantize(anchor - Decimal::from(i as u64) * self.tick_size, self.tick_size);
            let cumulative: Decimal = bid_levels
                .iter()
                .filter(|(p, _)| *p >= level_price)
                .map(|(_, v)| *v)
                .sum();
            bids.push((level_price, cumulative));
        }

        let mut asks = Vec::with_capacity(depth);
        for i in 1..=depth {
            let level_price = quantize(anchor + Decimal::from(i as u64) * self.tick_size, self.tick_size);
            let cumulative: Decimal = ask_levels
                .iter()
                .filter(|(p, _)| *p <= level_price)
                .map(|(_, v)| *v)
                .sum();
            asks.push((level_price, cumulative));
        }

        DepthSnapshot { bids, asks }
    }

    pub fn users(&self) -> Vec<String> {
        let mut users: Vec<String> = self.user_positions.keys().cloned().collect();
        users.sort();
        users
    }

    pub fn position_history(&self, user: &str) -> Option<&[(DateTime<Utc>, Decimal)]> {
        self.user_positions.get(user).map(Vec::as_slice)
    }

    pub fn pnl_history(&self, user: &str) -> Option<&[(DateTime<Utc>, Decimal)]> {
        self.user_pnls.get(user).map(Vec::as_slice)
    }

    pub fn mid_price_history(&self) -> &[(DateTime<Utc>, Decimal)] {
        &self.mid_prices
    }

    pub fn tick_size(&self) -> Decimal {
        self.tick_size
    }

    pub fn max_order_volume(&self) -> Decimal {
        self.max_order_volume
    }

    pub fn bid_volume(&self) -> Decimal {
        self.bids.total_volume
    }

    pub fn ask_volume(&self) -> Decimal {
        self.asks.total_volume
    }

    /// Registers `user` in the ledger with a zero-position, zero-PnL starting sample, without
    /// recording a trade. Used to seed the simulator's placeholder market-maker account so it
    /// shows up in `GET /users` even before it ever trades.
    pub fn touch_user(&mut self, user: &str) {
        self.ensure_user(user, Utc::now());
    }
}
