mod common;

use lambdasim::{
    Callback, Context, EXECUTED_VERSION_HEADER, GatewayProxy, Headers, LOG_RESULT_HEADER,
    REQUEST_ID_HEADER, Simulator,
    gateway::{BAD_GATEWAY, MALFORMED_RESPONSE, MISSING_BODY},
    testing::RecordingHandler,
};
use serde_json::{Value, json};

fn proxy_answer(answer: Value) -> impl Fn(Value, Context, Callback) -> std::future::Ready<Value> + Send + Sync + 'static {
    move |_event, _context, _callback| std::future::ready(answer.clone())
}

// ============================================================================
// Request Side
// ============================================================================

#[tokio::test]
async fn test_path_parameters_from_template() {
    let recorder = RecordingHandler::new();
    let simulator = Simulator::builder(recorder.clone())
        .transform(GatewayProxy::with_template("/resource/:id").unwrap())
        .build();

    simulator.get("/resource/42").await;
    simulator.get("/elsewhere/42").await;

    let events = recorder.events();
    assert_eq!(events[0]["pathParameters"], json!({"id": "42"}));
    assert_eq!(events[0]["resource"], "/resource/:id");
    assert_eq!(events[1]["pathParameters"], json!({}));
}

#[tokio::test]
async fn test_proxy_event_shape() {
    let recorder = RecordingHandler::new();
    let simulator = Simulator::builder(recorder.clone())
        .transform(GatewayProxy::with_template("/orders/{orderId}").unwrap())
        .build();

    let headers = Headers::from([
        ("accept".to_string(), "text/html, application/json".to_string()),
        ("x-trace".to_string(), "abc".to_string()),
    ]);
    simulator
        .invoke("PUT", "/orders/9?expand=items", json!({"qty": 3}), headers)
        .await;

    let event = &recorder.events()[0];
    assert_eq!(event["httpMethod"], "PUT");
    assert_eq!(event["path"], "/orders/9?expand=items");
    assert_eq!(event["body"], r#"{"qty":3}"#);
    assert_eq!(event["pathParameters"], json!({"orderId": "9"}));
    assert_eq!(event["queryStringParameters"], json!({"expand": "items"}));
    assert_eq!(event["headers"]["x-trace"], "abc");
    assert_eq!(
        event["multiValueHeaders"]["accept"],
        json!(["text/html", "application/json"])
    );
    assert_eq!(event["isBase64Encoded"], false);
}

#[tokio::test]
async fn test_multi_value_projection_trims_segments() {
    let recorder = RecordingHandler::new();
    let simulator = Simulator::builder(recorder.clone())
        .transform(GatewayProxy::new())
        .build();

    let headers = Headers::from([("x-list".to_string(), "a, b , c".to_string())]);
    simulator.invoke("GET", "/", json!({}), headers).await;

    assert_eq!(
        recorder.events()[0]["multiValueHeaders"]["x-list"],
        json!(["a", "b", "c"])
    );
}

// ============================================================================
// Response Side
// ============================================================================

#[tokio::test]
async fn test_declared_status_and_body() {
    let simulator = Simulator::builder(proxy_answer(json!({"statusCode": 666, "body": "{}"})))
        .transform(GatewayProxy::new())
        .build();
    let response = simulator.get("/").await;

    assert_eq!(response.status_code(), 666);
    assert_eq!(response.body(), Some(&json!({})));
}

#[tokio::test]
async fn test_unparseable_body_is_bad_gateway() {
    let simulator = Simulator::builder(proxy_answer(json!({"body": "not json"})))
        .transform(GatewayProxy::new())
        .build();
    let response = simulator.get("/").await;

    assert_eq!(response.status_code(), BAD_GATEWAY);
    assert_eq!(response.body(), Some(&json!(MALFORMED_RESPONSE)));
    assert!(response.header(REQUEST_ID_HEADER).is_some());
}

#[tokio::test]
async fn test_missing_body_field() {
    let simulator = Simulator::builder(proxy_answer(json!({"statusCode": 200})))
        .transform(GatewayProxy::new())
        .build();
    let response = simulator.get("/").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.body(), Some(&json!(MISSING_BODY)));
}

#[tokio::test]
async fn test_handler_returning_nothing() {
    let simulator = Simulator::builder(RecordingHandler::new())
        .transform(GatewayProxy::new())
        .build();
    let response = simulator.get("/").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.body(), Some(&json!(MISSING_BODY)));
}

#[tokio::test]
async fn test_headers_merged_and_diagnostics_stripped() {
    let simulator = Simulator::builder(proxy_answer(json!({
        "statusCode": 201,
        "headers": {"Content-Type": "application/hal+json", "Location": "/orders/1"},
        "multiValueHeaders": {"Set-Cookie": ["a=1", "b=2"]},
        "body": r#"{"id":1}"#,
    })))
    .transform(GatewayProxy::new())
    .build();
    let response = simulator.post("/orders", json!({})).await;

    assert_eq!(response.status_code(), 201);
    assert_eq!(response.body(), Some(&json!({"id": 1})));
    assert_eq!(response.header("Content-Type"), Some("application/hal+json"));
    assert_eq!(response.header("Location"), Some("/orders/1"));
    assert_eq!(response.header("Set-Cookie"), Some("a=1, b=2"));
    assert!(response.header(REQUEST_ID_HEADER).is_some());
    assert_eq!(response.header(LOG_RESULT_HEADER), None);
    assert_eq!(response.header(EXECUTED_VERSION_HEADER), None);
}

#[tokio::test]
async fn test_round_trip_through_proxy() {
    let simulator = Simulator::builder(|event: Value, _context: Context, _callback: Callback| async move {
        let order: Value = serde_json::from_str(event["body"].as_str().unwrap_or("null"))
            .unwrap_or(Value::Null);
        json!({
            "statusCode": 200,
            "body": json!({
                "order": event["pathParameters"]["id"],
                "qty": order["qty"],
            })
            .to_string(),
        })
    })
    .transform(GatewayProxy::with_template("/orders/:id").unwrap())
    .build();

    let response = simulator.post("/orders/77", json!({"qty": 4})).await;
    assert_eq!(response.body(), Some(&json!({"order": "77", "qty": 4})));
}
