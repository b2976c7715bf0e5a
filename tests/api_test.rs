use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use delivery_countdown::{api::responses::TimerView, create_router, AppState, Phase};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), Duration::from_secs(60)));
    create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn view(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TimerView {
    let (status, bytes) = send(app, method, uri, body).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test(start_paused = true)]
async fn start_then_tick_then_stop() {
    let app = app();

    let idle = view(&app, Method::GET, "/timer", None).await;
    assert!(!idle.timer.is_active);
    assert!(!idle.show_timer);

    let started = view(
        &app,
        Method::POST,
        "/timer/start",
        Some(json!({
            "orderId": "A",
            "preparationTime": 10,
            "deliveryTime": "15:00",
            "status": "confirmed",
            "startTime": null,
            "orderType": "delivery"
        })),
    )
    .await;
    assert!(started.timer.is_active);
    assert_eq!(started.timer.phase, Phase::Preparation);
    assert_eq!(started.timer.time_remaining, 25.0);
    assert_eq!(started.formatted_time, "25m");
    assert!(started.show_timer);
    assert_eq!(started.last_action.as_deref(), Some("start"));

    tokio::time::sleep(Duration::from_secs(10 * 60 + 1)).await;
    let delivering = view(&app, Method::GET, "/timer", None).await;
    assert_eq!(delivering.timer.phase, Phase::Delivery);
    assert_eq!(delivering.timer.time_remaining, 15.0);

    let stopped = view(&app, Method::POST, "/timer/stop", None).await;
    assert!(!stopped.timer.is_active);
    assert_eq!(stopped.timer.time_remaining, 0.0);
    assert_eq!(stopped.timer.order_id, None);
}

#[tokio::test]
async fn delivered_status_stops_countdown() {
    let app = app();

    view(
        &app,
        Method::POST,
        "/timer/start",
        Some(json!({
            "orderId": "B",
            "preparationTime": 90,
            "deliveryTime": 20,
            "status": "preparing",
            "orderType": "delivery"
        })),
    )
    .await;

    let delivered = view(&app, Method::POST, "/timer/status", Some(json!({ "status": "delivered" }))).await;
    assert!(!delivered.timer.is_active);
    assert_eq!(delivered.timer.time_remaining, 110.0);
    assert_eq!(delivered.formatted_time, "1h 50m");
    assert_eq!(delivered.timer.order_status.as_str(), "delivered");
}

#[tokio::test]
async fn snapshot_uses_camel_case_wire_names() {
    let app = app();
    let (status, bytes) = send(&app, Method::GET, "/timer", None).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["timer"]["isActive"], json!(false));
    assert_eq!(body["timer"]["orderStatus"], json!("pending"));
    assert_eq!(body["timer"]["phase"], json!("preparation"));
    assert_eq!(body["formattedTime"], json!("0m"));
    assert_eq!(body["showTimer"], json!(false));
}

#[tokio::test]
async fn malformed_start_body_is_rejected() {
    let app = app();
    let (status, _) = send(&app, Method::POST, "/timer/start", Some(json!({ "preparationTime": 5 }))).await;
    assert!(status.is_client_error());

    let after = view(&app, Method::GET, "/timer", None).await;
    assert!(!after.timer.is_active);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, bytes) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], json!("ok"));
}
