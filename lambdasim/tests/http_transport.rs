#![cfg(feature = "http")]

mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use lambdasim::{
    GatewayProxy, Simulator,
    http::router,
    testing::{EchoHandler, RecordingHandler},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_get_invokes_with_query_only() {
    let app = router(Arc::new(Simulator::new(EchoHandler)));
    let request = Request::builder()
        .uri("/items?page=3")
        .body(Body::from(r#"{"ignored": true}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/json");
    assert!(response.headers().contains_key("x-amzn-requestid"));
    assert_eq!(body_json(response).await, json!({"page": "3"}));
}

#[tokio::test]
async fn test_post_parses_json_body() {
    let app = router(Arc::new(Simulator::new(EchoHandler)));
    let request = Request::builder()
        .method("POST")
        .uri("/orders?source=web")
        .body(Body::from(r#"{"qty": 2}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(body_json(response).await, json!({"qty": 2, "source": "web"}));
}

#[tokio::test]
async fn test_unparseable_body_becomes_empty_object() {
    let app = router(Arc::new(Simulator::new(EchoHandler)));
    let request = Request::builder()
        .method("PUT")
        .uri("/")
        .body(Body::from("definitely not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(body_json(response).await, json!({}));
}

#[tokio::test]
async fn test_absent_body_is_empty_payload() {
    let app = router(Arc::new(Simulator::new(RecordingHandler::new())));
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_gateway_status_reaches_http() {
    let recorder = RecordingHandler::new();
    let simulator = Simulator::builder(recorder.clone())
        .transform(GatewayProxy::with_template("/users/{id}").unwrap())
        .build();
    let app = router(Arc::new(simulator));

    let request = Request::builder()
        .method("DELETE")
        .uri("/users/5")
        .header("x-tag", "a")
        .header("x-tag", "b")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    // RecordingHandler returns nothing, so the proxy reports the missing body.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!("ERROR: body is missing"));

    let event = &recorder.events()[0];
    assert_eq!(event["httpMethod"], "DELETE");
    assert_eq!(event["pathParameters"], json!({"id": "5"}));
    assert_eq!(event["headers"]["x-tag"], "a, b");
    assert_eq!(event["multiValueHeaders"]["x-tag"], json!(["a", "b"]));
}

#[tokio::test]
async fn test_malformed_proxy_answer_is_502() {
    let simulator = Simulator::builder(|_event: Value, _context: lambdasim::Context, _callback: lambdasim::Callback| async {
        json!({"statusCode": 200, "body": "<html>"})
    })
    .transform(GatewayProxy::new())
    .build();
    let app = router(Arc::new(simulator));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await, json!("malformed Lambda proxy response"));
}

#[tokio::test]
async fn test_multi_value_cookies_are_separate_fields() {
    let simulator = Simulator::builder(|_event: Value, _context: lambdasim::Context, _callback: lambdasim::Callback| async {
        json!({
            "statusCode": 200,
            "multiValueHeaders": {"Set-Cookie": ["session=abc; Expires=Wed, 21 Oct 2026 07:28:00 GMT", "theme=dark"]},
            "body": "{}",
        })
    })
    .transform(GatewayProxy::new())
    .build();
    let app = router(Arc::new(simulator));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let cookies: Vec<&str> = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|value| value.to_str().unwrap())
        .collect();
    assert_eq!(
        cookies,
        vec!["session=abc; Expires=Wed, 21 Oct 2026 07:28:00 GMT", "theme=dark"]
    );
}
