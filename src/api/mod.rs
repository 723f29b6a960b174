//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The HTTP-over-JSON service boundary: the routes table from the spec, wired onto axum, with the
// shared book reachable only through `AppGate`. Every handler acquires the gate for exactly the
// duration of its operation — there is no additional locking here.
//
// | Name   | Description                          | Key Methods |
// |--------|---------------------------------------|------------|
// | Api    | Builds the router and serves it        | router, serve |
//--------------------------------------------------------------------------------------------------

mod dto;
mod error;
mod routes;

use std::net::SocketAddr;

use axum::{
    http::Method,
    routing::{get, post},
    Extension, Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

pub use dto::*;
pub use error::{ApiError, ApiResult};

use crate::gate::AppGate;

pub struct Api {
    addr: SocketAddr,
    gate: AppGate,
}

impl Api {
    pub fn new(addr: SocketAddr, gate: AppGate) -> Self {
        Self { addr, gate }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([Method::GET, Method::POST]);

        Router::new()
            .route("/", get(routes::index))
            .route("/mid_price", get(routes::mid_price))
            .route("/orderbook", get(routes::orderbook))
            .route("/add_order", post(routes::add_order))
            .route("/del_order", post(routes::del_order))
            .route("/users", get(routes::users))
            .route("/pnl_history/:user", get(routes::pnl_history))
            .route("/positions/:user", get(routes::positions))
            .layer(Extension(self.gate.clone()))
            .layer(cors)
    }

    pub async fn serve(self) -> Result<(), std::io::Error> {
        let app = self.router();
        info!(addr = %self.addr, "listening");
        let listener = TcpListener::bind(self.addr).await?;
        axum::serve(listener, app).await
    }
}
