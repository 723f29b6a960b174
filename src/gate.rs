//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The single-writer gate: one mutex shared by the HTTP service and the simulator thread. Every
// mutating call acquires it for the whole operation; every read snapshot acquires it for the
// duration of the copy it returns, so callers never observe a torn state.
//
// | Name     | Description                                  | Key Methods                  |
// |----------|-----------------------------------------------|-------------------------------|
// | AppGate  | Cloneable handle to the shared book            | submit, cancel, depth_snapshot |
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::book::{Book, DepthSnapshot, OrderRequest};
use crate::types::{BookError, OrderId};

/// A cheaply cloneable handle to the book, guarded by one `parking_lot::Mutex`. Matching performs
/// no I/O, so the lock is always held synchronously and never across an `.await`.
#[derive(Clone)]
pub struct AppGate(Arc<Mutex<Book>>);

impl AppGate {
    pub fn new(book: Book) -> Self {
        Self(Arc::new(Mutex::new(book)))
    }

    pub fn submit(&self, req: OrderRequest) -> Result<OrderId, BookError> {
        self.0.lock().submit(req)
    }

    pub fn cancel(&self, id: OrderId) -> bool {
        self.0.lock().cancel(id)
    }

    pub fn depth_snapshot(&self, depth: usize) -> DepthSnapshot {
        self.0.lock().depth_snapshot(depth)
    }

    pub fn mid_price_history(&self) -> Vec<(DateTime<Utc>, Decimal)> {
        self.0.lock().mid_price_history().to_vec()
    }

    pub fn users(&self) -> Vec<String> {
        self.0.lock().users()
    }

    pub fn pnl_history(&self, user: &str) -> Option<Vec<(DateTime<Utc>, Decimal)>> {
        self.0.lock().pnl_history(user).map(|slice| slice.to_vec())
    }

    pub fn position_history(&self, user: &str) -> Option<Vec<(DateTime<Utc>, Decimal)>> {
        self.0.lock().position_history(user).map(|slice| slice.to_vec())
    }

    pub fn tick_size(&self) -> Decimal {
        self.0.lock().tick_size()
    }

    pub fn max_order_volume(&self) -> Decimal {
        self.0.lock().max_order_volume()
    }

    pub fn mid_price(&self) -> Option<Decimal> {
        self.0.lock().mid_price()
    }

    pub fn bid_volume(&self) -> Decimal {
        self.0.lock().bid_volume()
    }

    pub fn ask_volume(&self) -> Decimal {
        self.0.lock().ask_volume()
    }

    pub fn touch_user(&self, user: &str) {
        self.0.lock().touch_user(user)
    }
}
