mod common;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use common::{service_with, tool_payload, MockStatisticsStore};
use market_stats_mcp::mcp;

#[actix_web::test]
async fn test_http_ping() {
    let service = service_with(Arc::new(MockStatisticsStore::seoul()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(mcp::config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/mcp")
        .set_json(json!({ "jsonrpc": "2.0", "id": 1, "method": "ping" }))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp["jsonrpc"], "2.0");
    assert_eq!(resp["id"], 1);
    assert!(resp["result"].is_object());
}

#[actix_web::test]
async fn test_http_notification_accepted() {
    let service = service_with(Arc::new(MockStatisticsStore::seoul()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(mcp::config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/mcp")
        .set_json(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
}

#[actix_web::test]
async fn test_http_tool_call() {
    let service = service_with(Arc::new(MockStatisticsStore::seoul()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(mcp::config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/mcp")
        .set_json(json!({
            "jsonrpc": "2.0",
            "id": "call-1",
            "method": "tools/call",
            "params": {
                "name": "get_income_distribution",
                "arguments": { "region": "노원구" }
            }
        }))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;

    let payload = tool_payload(&resp["result"]);
    assert_eq!(payload["total_households"], 20_000);
    assert_eq!(payload["average_income"], 4000.0);
}

#[actix_web::test]
async fn test_http_get_not_allowed() {
    let service = service_with(Arc::new(MockStatisticsStore::seoul()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(mcp::config),
    )
    .await;

    let req = test::TestRequest::get().uri("/mcp").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn test_http_malformed_body_is_parse_error() {
    let service = service_with(Arc::new(MockStatisticsStore::seoul()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(mcp::config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/mcp")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], -32700);
    assert!(body["id"].is_null());
}

#[actix_web::test]
async fn test_http_wrong_shape_is_invalid_request() {
    let service = service_with(Arc::new(MockStatisticsStore::seoul()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .configure(mcp::config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/mcp")
        .set_json(json!({ "jsonrpc": "2.0", "id": 4 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["error"]["code"], -32600);
    assert_eq!(body["id"], 4);
}
