//! Request pipeline tests: routing, envelopes and error mapping.
//!
//! Requests are driven through the fully layered router in-process.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use uuid::Uuid;

use event_rest::error::GENERIC_SERVER_MESSAGE;
use event_rest::http::X_REQUEST_ID;

mod common;

use common::{app, app_with, get, post_json, send};

#[tokio::test]
async fn action_route_returns_processor_result() {
    let (status, _, body) = send(
        app(),
        post_json("/create-order", r#"{"sku":"ABC-1","quantity":3}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["result"]["sku"], "ABC-1");
    assert_eq!(body["result"]["quantity"], 3);
    assert!(Uuid::parse_str(body["result"]["orderId"].as_str().unwrap()).is_ok());
    assert_eq!(body.as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn explicit_path_is_used_verbatim() {
    let (status, _, body) = send(app(), post_json("/custom", "{}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "result": { "cancelled": true } }));

    // The kebab-cased action name is not also exposed.
    let (status, _, _) = send(app(), post_json("/cancel-order", "{}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn event_without_action_has_no_route() {
    for path in ["/audit-trail", "/AuditTrail", "/auditTrail"] {
        let (status, _, body) = send(app(), post_json(path, "{}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], format!("Cannot POST {path}"));
    }
}

#[tokio::test]
async fn action_route_accepts_post_only() {
    for method in ["GET", "PUT", "DELETE", "PATCH"] {
        let request = Request::builder()
            .method(method)
            .uri("/create-order")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], format!("Cannot {method} /create-order"));
    }
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (status, _, body) = send(app(), post_json("/create-order", r#"{"sku": "#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("invalid JSON body"));
}

#[tokio::test]
async fn malformed_json_is_rejected_on_any_route() {
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .header("content-type", "application/json")
        .body(Body::from("{nope"))
        .unwrap();
    let (status, _, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _, _) = send(app(), post_json("/does-not-exist", "[1,")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn top_level_scalar_is_rejected() {
    let (status, _, body) = send(app(), post_json("/custom", "42")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "invalid JSON body: top-level value must be an object or array"
    );
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let big = format!(r#"{{"sku":"{}","quantity":1}}"#, "x".repeat(256));
    let (status, _, body) = send(app_with(event_rest::health::AlwaysHealthy, 64), post_json("/create-order", &big)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn non_json_body_decodes_to_empty_object() {
    let request = Request::builder()
        .method("POST")
        .uri("/custom")
        .header("content-type", "text/plain")
        .body(Body::from("outcome=missing"))
        .unwrap();
    let (status, _, body) = send(app(), request).await;

    // Body ignored, so the default outcome applies.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["cancelled"], true);
}

#[tokio::test]
async fn constructor_failure_is_normalized() {
    let (status, _, body) = send(app(), post_json("/create-order", r#"{"sku":"A","quantity":0}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({ "success": false, "message": "quantity must be positive" }));

    let (status, _, body) = send(app(), post_json("/create-order", "{}")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("sku"));
}

#[tokio::test]
async fn client_fault_keeps_its_status_and_message() {
    let (status, _, body) = send(app(), post_json("/custom", r#"{"outcome":"missing"}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "order 17 does not exist" }));
}

#[tokio::test]
async fn unclassified_failure_is_redacted() {
    let (status, _, body) = send(app(), post_json("/custom", r#"{"outcome":"boom"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "message": GENERIC_SERVER_MESSAGE }));
    assert!(!body.to_string().contains("hunter2"));
}

#[tokio::test]
async fn server_fault_uses_safe_message() {
    let (status, _, body) = send(app(), post_json("/custom", r#"{"outcome":"busy"}"#)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], "try again shortly");
}

#[tokio::test]
async fn processor_panic_becomes_server_fault() {
    let (status, _, body) = send(app(), post_json("/custom", r#"{"outcome":"panic"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "message": GENERIC_SERVER_MESSAGE }));
}

#[tokio::test]
async fn health_reports_healthy() {
    let (status, _, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "healthy": true }));
}

#[tokio::test]
async fn health_reports_unhealthy_probe() {
    let (status, _, body) = send(app_with(|| false, 1024), get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "healthy": false }));
}

#[tokio::test]
async fn health_rejects_post() {
    let (status, _, body) = send(app(), post_json("/health", "{}")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn every_response_carries_a_fresh_request_id() {
    let (_, first, _) = send(app(), get("/health")).await;
    let (_, second, _) = send(app(), post_json("/nowhere", "{}")).await;

    let first = first.get(X_REQUEST_ID).unwrap().to_str().unwrap();
    let second = second.get(X_REQUEST_ID).unwrap().to_str().unwrap();
    assert!(Uuid::parse_str(first).is_ok());
    assert!(Uuid::parse_str(second).is_ok());
    assert_ne!(first, second);
}

#[tokio::test]
async fn incoming_request_id_is_not_trusted() {
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .header("x-request-id", "client-chosen")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = send(app(), request).await;
    assert_ne!(headers.get(X_REQUEST_ID).unwrap(), "client-chosen");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let request = Request::builder()
        .method("POST")
        .uri("/custom")
        .header("origin", "https://elsewhere.example")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, headers, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/create-order")
        .header("origin", "https://elsewhere.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app(), request).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert!(response
        .headers()
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("POST"));
}
