//--------------------------------------------------------------------------------------------------
// TEST MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Integration tests for the HTTP service boundary, exercised through `tower::ServiceExt::oneshot`
// against the real router — no server socket is bound.
//--------------------------------------------------------------------------------------------------

use std::net::SocketAddr;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use rust_decimal_macros::dec;
use serde_json::{from_slice, json, Value};
use tower::ServiceExt;

use sim_lob::api::Api;
use sim_lob::{AppGate, Book};

fn setup_test_router() -> Router {
    let gate = AppGate::new(Book::new(dec!(0.1), dec!(100.0)));
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    Api::new(addr, gate).router()
}

async fn parse_json_response(response: axum::response::Response) -> Value {
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    from_slice(&body_bytes).unwrap()
}

fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::post(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn index_serves_html() {
    let app = setup_test_router();
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn add_order_returns_order_dict_with_id() {
    let app = setup_test_router();
    let body = json!({"side": "ask", "price": "100.1", "volume": "5.0", "kind": "limit", "user": null});
    let response = app.oneshot(post_json("/add_order", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = parse_json_response(response).await;
    assert_eq!(parsed["order_dict"]["side"], "ask");
    assert!(parsed["order_dict"]["id"].is_number());
}

#[tokio::test]
async fn add_order_rejects_invalid_side() {
    let app = setup_test_router();
    let body = json!({"side": "up", "price": "100.1", "volume": "5.0", "kind": "limit", "user": null});
    let response = app.oneshot(post_json("/add_order", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed = parse_json_response(response).await;
    assert!(parsed["error"].is_string());
}

#[tokio::test]
async fn del_order_round_trip() {
    let app = setup_test_router();
    let body = json!({"side": "bid", "price": "99.0", "volume": "1.0", "kind": "limit", "user": null});
    let response = app.clone().oneshot(post_json("/add_order", body)).await.unwrap();
    let parsed = parse_json_response(response).await;
    let id = parsed["order_dict"]["id"].as_u64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/del_order", json!({"order_id": id})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json("/del_order", json!({"order_id": id})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn orderbook_reports_depth_ten_each_side() {
    let app = setup_test_router();
    let response = app
        .oneshot(Request::get("/orderbook").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let parsed = parse_json_response(response).await;
    assert_eq!(parsed["bids"].as_array().unwrap().len(), 10);
    assert_eq!(parsed["asks"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn users_trade_and_history_round_trip() {
    let app = setup_test_router();
    let ask = json!({"side": "ask", "price": "100.0", "volume": "4.0", "kind": "limit", "user": "alice"});
    app.clone().oneshot(post_json("/add_order", ask)).await.unwrap();

    let market = json!({"side": "bid", "price": null, "volume": "4.0", "kind": "market", "user": "bob"});
    app.clone().oneshot(post_json("/add_order", market)).await.unwrap();

    let response = app
        .clone()
        .oneshot(Request::get("/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let users: Vec<String> = serde_json::from_slice(
        &to_bytes(response.into_body(), 1024).await.unwrap(),
    )
    .unwrap();
    assert!(users.contains(&"alice".to_string()));
    assert!(users.contains(&"bob".to_string()));

    let response = app
        .clone()
        .oneshot(Request::get("/positions/alice").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let parsed = parse_json_response(response).await;
    assert_eq!(parsed["user"], "alice");
    assert!(!parsed["positions"].as_array().unwrap().is_empty());

    let response = app
        .oneshot(Request::get("/pnl_history/bob").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let parsed = parse_json_response(response).await;
    assert_eq!(parsed["user"], "bob");
}

#[tokio::test]
async fn mid_price_empty_until_both_sides_present() {
    let app = setup_test_router();
    let response = app
        .oneshot(Request::get("/mid_price").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let parsed = parse_json_response(response).await;
    assert!(parsed["times"].as_array().unwrap().is_empty());
    assert!(parsed["prices"].as_array().unwrap().is_empty());
}
