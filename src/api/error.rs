//--------------------------------------------------------------------------------------------------
// ENUMS
//--------------------------------------------------------------------------------------------------
// | Name      | Description                                             | Key Methods |
// |-----------|---------------------------------------------------------|-------------|
// | ApiError  | Maps a BookError (or a not-found cancel) onto a response | from        |
//--------------------------------------------------------------------------------------------------

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::types::BookError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Every validation failure here is a 400 — the book's own taxonomy (§7) recovers all of them at
/// the service boundary; nothing reaches this layer that wasn't already a `BookError`.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] BookError),

    #[error("order not found: {0}")]
    OrderNotFound(u64),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let body = Json(json!({ "error": message }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
