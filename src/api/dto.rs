//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name                | Description                                    |
// |---------------------|------------------------------------------------|
// | AddOrderResponse     | `{order_dict: {...,id}}` body for POST /add_order |
// | OrderDict            | Echo of the admitted order plus its assigned id |
// | DelOrderRequest      | `{order_id}` body for POST /del_order           |
// | DelOrderResponse     | `{order_id}` body on a successful cancel        |
// | MidPriceResponse     | `{times, prices}` body for GET /mid_price       |
// | OrderBookResponse    | `{bids, asks}` body for GET /orderbook           |
// | PnlHistoryResponse   | `{user, times, pnls}` body for GET /pnl_history/<user> |
// | PositionHistoryResponse | `{user, times, positions}` body for GET /positions/<user> |
//--------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::book::{DepthSnapshot, OrderRequest};
use crate::types::OrderId;

/// Echoes the fields the client submitted, plus the id the book assigned — shaped like the
/// Python original's order dict (`{**order_dict, 'id': order_id}`).
#[derive(Debug, Clone, Serialize)]
pub struct OrderDict {
    pub id: OrderId,
    pub side: Option<String>,
    pub price: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub kind: Option<String>,
    pub user: Option<String>,
}

impl OrderDict {
    pub fn new(id: OrderId, req: &OrderRequest) -> Self {
        Self {
            id,
            side: req.side.clone(),
            price: req.price,
            volume: req.volume,
            kind: req.kind.clone(),
            user: req.user.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddOrderResponse {
    pub order_dict: OrderDict,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DelOrderRequest {
    pub order_id: OrderId,
}

#[derive(Debug, Clone, Serialize)]
pub struct DelOrderResponse {
    pub order_id: OrderId,
}

#[derive(Debug, Clone, Serialize)]
pub struct MidPriceResponse {
    pub times: Vec<DateTime<Utc>>,
    pub prices: Vec<String>,
}

impl MidPriceResponse {
    pub fn from_series(series: Vec<(DateTime<Utc>, Decimal)>) -> Self {
        let (times, prices) = series.into_iter().map(|(t, p)| (t, p.to_string())).unzip();
        Self { times, prices }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderBookResponse {
    pub bids: Vec<(Decimal, Decimal)>,
    pub asks: Vec<(Decimal, Decimal)>,
}

impl From<DepthSnapshot> for OrderBookResponse {
    fn from(snapshot: DepthSnapshot) -> Self {
        Self {
            bids: snapshot.bids,
            asks: snapshot.asks,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PnlHistoryResponse {
    pub user: String,
    pub times: Vec<DateTime<Utc>>,
    pub pnls: Vec<String>,
}

impl PnlHistoryResponse {
    pub fn new(user: String, series: Vec<(DateTime<Utc>, Decimal)>) -> Self {
        let (times, pnls) = series.into_iter().map(|(t, p)| (t, p.to_string())).unzip();
        Self { user, times, pnls }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionHistoryResponse {
    pub user: String,
    pub times: Vec<DateTime<Utc>>,
    pub positions: Vec<String>,
}

impl PositionHistoryResponse {
    pub fn new(user: String, series: Vec<(DateTime<Utc>, Decimal)>) -> Self {
        let (times, positions) = series.into_iter().map(|(t, p)| (t, p.to_string())).unzip();
        Self { user, times, positions }
    }
}
