//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name          | Description                                  | Return Type        |
// |---------------|----------------------------------------------|--------------------|
// | index         | Static HTML shell for the out-of-core viewer  | Html<&'static str>  |
// | mid_price     | Mid-price time series                         | Json<MidPriceResponse> |
// | orderbook     | Depth-10 visualization snapshot               | Json<OrderBookResponse> |
// | add_order     | Admits a new order                            | ApiResult<Json<AddOrderResponse>> |
// | del_order     | Cancels an order by id                        | ApiResult<Json<DelOrderResponse>> |
// | users         | Known user handles                            | Json<Vec<String>>  |
// | pnl_history   | One user's P&L time series                    | Json<PnlHistoryResponse> |
// | positions     | One user's position time series               | Json<PositionHistoryResponse> |
//--------------------------------------------------------------------------------------------------

use axum::{
    extract::{Extension, Path},
    response::Html,
    Json,
};

use super::{
    ApiError, ApiResult, AddOrderResponse, DelOrderRequest, DelOrderResponse, MidPriceResponse,
    OrderBookResponse, OrderDict, PnlHistoryResponse, PositionHistoryResponse,
};
use crate::book::OrderRequest;
use crate::gate::AppGate;

const DEPTH: usize = 10;

pub async fn index() -> Html<&'static str> {
    Html("<html><body><h1>sim-lob</h1><p>see /mid_price, /orderbook, /users</p></body></html>")
}

pub async fn mid_price(Extension(gate): Extension<AppGate>) -> Json<MidPriceResponse> {
    Json(MidPriceResponse::from_series(gate.mid_price_history()))
}

pub async fn orderbook(Extension(gate): Extension<AppGate>) -> Json<OrderBookResponse> {
    Json(gate.depth_snapshot(DEPTH).into())
}

pub async fn add_order(
    Extension(gate): Extension<AppGate>,
    Json(req): Json<OrderRequest>,
) -> ApiResult<Json<AddOrderResponse>> {
    let id = gate.submit(req.clone())?;
    Ok(Json(AddOrderResponse {
        order_dict: OrderDict::new(id, &req),
    }))
}

pub async fn del_order(
    Extension(gate): Extension<AppGate>,
    Json(req): Json<DelOrderRequest>,
) -> ApiResult<Json<DelOrderResponse>> {
    if gate.cancel(req.order_id) {
        Ok(Json(DelOrderResponse { order_id: req.order_id }))
    } else {
        Err(ApiError::OrderNotFound(req.order_id))
    }
}

pub async fn users(Extension(gate): Extension<AppGate>) -> Json<Vec<String>> {
    Json(gate.users())
}

pub async fn pnl_history(
    Extension(gate): Extension<AppGate>,
    Path(user): Path<String>,
) -> Json<PnlHistoryResponse> {
    let series = gate.pnl_history(&user).unwrap_or_default();
    Json(PnlHistoryResponse::new(user, series))
}

pub async fn positions(
    Extension(gate): Extension<AppGate>,
    Path(user): Path<String>,
) -> Json<PositionHistoryResponse> {
    let series = gate.position_history(&user).unwrap_or_default();
    Json(PositionHistoryResponse::new(user, series))
}
