mod common;

use axum::http::Method;
use serde_json::json;

use common::{error_fields, TestApp};

#[tokio::test]
async fn alert_defaults_and_status_transition() {
    let app = TestApp::new().await;
    let item_id = app
        .create_item(json!({"name": "Laptop", "sku": "LAP-001", "quantity": 3, "price": 1000}))
        .await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/alerts",
            Some(json!({
                "itemName": "Laptop",
                "itemId": item_id,
                "message": "Laptop stock is below reorder level"
            })),
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(body["message"], "Alert created successfully");
    let alert = &body["data"];
    assert_eq!(alert["type"], "Low Stock");
    assert_eq!(alert["status"], "Active");
    assert_eq!(alert["severity"], "Medium");
    assert_eq!(alert["item"]["id"], item_id);
    assert_eq!(alert["item"]["name"], "Laptop");
    let alert_id = alert["id"].as_i64().expect("alert id");

    let (_, active) = app.call(Method::GET, "/api/alerts?status=Active", None).await;
    assert_eq!(active["count"], 1);

    let (status, patched) = app
        .call(
            Method::PATCH,
            &format!("/api/alerts/{alert_id}/status"),
            Some(json!({"status": "Resolved"})),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(patched["message"], "Alert status updated successfully");
    assert_eq!(patched["data"]["status"], "Resolved");

    let (_, active) = app.call(Method::GET, "/api/alerts?status=Active", None).await;
    assert_eq!(active["count"], 0);
    assert_eq!(active["data"], json!([]));

    let (_, resolved) = app.call(Method::GET, "/api/alerts?status=Resolved", None).await;
    assert_eq!(resolved["count"], 1);
    assert_eq!(resolved["data"][0]["id"], alert_id);
}

#[tokio::test]
async fn alert_status_must_be_known() {
    let app = TestApp::new().await;
    let alert_id = app
        .create_alert(json!({"itemName": "Laptop", "message": "Check stock"}))
        .await;

    for payload in [json!({"status": "Snoozed"}), json!({})] {
        let (status, body) = app
            .call(
                Method::PATCH,
                &format!("/api/alerts/{alert_id}/status"),
                Some(payload),
            )
            .await;
        assert_eq!(status, 400);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid status");
    }

    let (_, fetched) = app.call(Method::GET, &format!("/api/alerts/{alert_id}"), None).await;
    assert_eq!(fetched["data"]["status"], "Active");

    let (status, _) = app
        .call(
            Method::PATCH,
            "/api/alerts/9999/status",
            Some(json!({"status": "Dismissed"})),
        )
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn alert_filters_combine() {
    let app = TestApp::new().await;
    app.create_alert(json!({"itemName": "Laptop", "message": "low", "severity": "High"}))
        .await;
    app.create_alert(json!({
        "itemName": "Mouse",
        "message": "gone",
        "type": "Out of Stock",
        "severity": "Critical"
    }))
    .await;
    app.create_alert(json!({
        "itemName": "Desk",
        "message": "fyi",
        "type": "Info",
        "severity": "Low"
    }))
    .await;

    let (status, all) = app.call(Method::GET, "/api/alerts", None).await;
    assert_eq!(status, 200);
    assert_eq!(all["count"], 3);
    // Newest first
    assert_eq!(all["data"][0]["itemName"], "Desk");
    assert_eq!(all["data"][2]["itemName"], "Laptop");

    let (_, critical) = app.call(Method::GET, "/api/alerts?severity=Critical", None).await;
    assert_eq!(critical["count"], 1);
    assert_eq!(critical["data"][0]["itemName"], "Mouse");

    let (_, out_of_stock) = app
        .call(Method::GET, "/api/alerts?type=Out%20of%20Stock&status=Active", None)
        .await;
    assert_eq!(out_of_stock["count"], 1);
    assert_eq!(out_of_stock["data"][0]["type"], "Out of Stock");

    let (status, body) = app.call(Method::GET, "/api/alerts?severity=Extreme", None).await;
    assert_eq!(status, 400);
    assert_eq!(error_fields(&body), vec!["severity"]);
}

#[tokio::test]
async fn alert_validation_failures() {
    let app = TestApp::new().await;

    let (status, body) = app.call(Method::POST, "/api/alerts", Some(json!({}))).await;
    assert_eq!(status, 400);
    assert_eq!(error_fields(&body), vec!["itemName", "message"]);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/alerts",
            Some(json!({"itemName": "Laptop", "message": "low", "itemId": 4242})),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(error_fields(&body), vec!["itemId"]);
    assert_eq!(body["errors"][0]["message"], "Item does not exist");

    let (status, body) = app
        .call(
            Method::POST,
            "/api/alerts",
            Some(json!({"itemName": "Laptop", "message": "low", "type": "Party"})),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(error_fields(&body), vec!["type"]);

    let (_, listed) = app.call(Method::GET, "/api/alerts", None).await;
    assert_eq!(listed["count"], 0);
}

#[tokio::test]
async fn deleting_item_keeps_its_alerts() {
    let app = TestApp::new().await;
    let item_id = app
        .create_item(json!({"name": "Laptop", "sku": "LAP-001", "quantity": 0, "price": 1000}))
        .await;
    let alert_id = app
        .create_alert(json!({
            "itemName": "Laptop",
            "itemId": item_id,
            "message": "Laptop is out of stock",
            "type": "Out of Stock"
        }))
        .await;

    let (status, _) = app.call(Method::DELETE, &format!("/api/items/{item_id}"), None).await;
    assert_eq!(status, 200);

    let (status, body) = app.call(Method::GET, &format!("/api/alerts/{alert_id}"), None).await;
    assert_eq!(status, 200);
    assert!(body["data"]["itemId"].is_null());
    assert!(body["data"]["item"].is_null());
    assert_eq!(body["data"]["itemName"], "Laptop");
}

#[tokio::test]
async fn deleting_alert_twice_reports_not_found() {
    let app = TestApp::new().await;
    let alert_id = app
        .create_alert(json!({"itemName": "Laptop", "message": "low"}))
        .await;

    let (status, body) = app
        .call(Method::DELETE, &format!("/api/alerts/{alert_id}"), None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Alert deleted successfully");

    let (status, body) = app
        .call(Method::DELETE, &format!("/api/alerts/{alert_id}"), None)
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Alert not found");
}

#[tokio::test]
async fn status_update_without_body_is_invalid_status() {
    let app = TestApp::new().await;
    let alert_id = app
        .create_alert(json!({"itemName": "Laptop", "message": "Check stock"}))
        .await;

    let (status, body) = app
        .call(Method::PATCH, &format!("/api/alerts/{alert_id}/status"), None)
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Invalid status");

    let response = app
        .request_raw(Method::PATCH, &format!("/api/alerts/{alert_id}/status"), "{oops")
        .await;
    assert_eq!(response.status(), 400);
    let body = common::response_json(response).await;
    assert_eq!(body["message"], "Invalid status");
}
