mod common;

use axum::http::Method;
use sea_orm::ConnectionTrait;
use serde_json::{json, Value};

use common::TestApp;

fn labels(row: &Value) -> Vec<String> {
    row["labels"]
        .as_array()
        .expect("labels array")
        .iter()
        .map(|l| l.as_str().expect("label string").to_string())
        .collect()
}

#[tokio::test]
async fn unassigned_low_stock_item_in_inventory_report() {
    let app = TestApp::new().await;
    app.create_item(json!({"name": "Laptop", "sku": "LAP-001", "quantity": 3, "price": 1000}))
        .await;

    let (status, body) = app.call(Method::GET, "/api/reports/inventory", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    let row = &body["data"][0];
    assert_eq!(row["sku"], "LAP-001");
    assert_eq!(row["price"], "1000.00");
    assert_eq!(row["supplier"], "Not assigned");
    assert_eq!(labels(row), vec!["Low Stock"]);
}

#[tokio::test]
async fn labels_are_evaluated_independently() {
    let app = TestApp::new().await;
    app.create_item(json!({
        "name": "Fragile glass vase",
        "sku": "VAS-001",
        "quantity": 0,
        "price": 30,
        "priority": true
    }))
    .await;
    app.create_item(json!({"name": "Desk", "sku": "DSK-001", "quantity": 40, "price": 250}))
        .await;

    let (_, body) = app.call(Method::GET, "/api/reports/inventory", None).await;
    let rows = body["data"].as_array().expect("rows");
    assert_eq!(
        labels(&rows[0]),
        vec!["Low Stock", "Out of Stock", "High Priority", "Fragile"]
    );
    assert!(labels(&rows[1]).is_empty());
}

#[tokio::test]
async fn supplier_report_counts_items() {
    let app = TestApp::new().await;
    let acme = app
        .create_supplier(json!({
            "name": "Acme Components",
            "type": "Local",
            "email": "a@acme.example"
        }))
        .await;
    app.create_supplier(json!({"name": "Empty Shelf Co"})).await;
    app.create_item(json!({
        "name": "Laptop",
        "sku": "LAP-001",
        "quantity": 3,
        "price": 1000,
        "supplierId": acme
    }))
    .await;

    let (status, body) = app.call(Method::GET, "/api/reports/suppliers", None).await;
    assert_eq!(status, 200);
    let rows = body["data"].as_array().expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Acme Components");
    assert_eq!(rows[0]["type"], "Local");
    assert_eq!(rows[0]["itemsCount"], 1);
    assert_eq!(rows[0]["items"][0]["name"], "Laptop");
    assert_eq!(rows[1]["itemsCount"], 0);
    assert_eq!(rows[1]["items"], json!([]));
}

#[tokio::test]
async fn alerts_report_is_newest_first() {
    let app = TestApp::new().await;
    app.create_alert(json!({"itemName": "Laptop", "message": "first"}))
        .await;
    app.create_alert(json!({"itemName": "Mouse", "message": "second"}))
        .await;

    let (status, body) = app.call(Method::GET, "/api/reports/alerts", None).await;
    assert_eq!(status, 200);
    let rows = body["data"].as_array().expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["message"], "second");
    assert_eq!(rows[1]["message"], "first");
    assert!(rows[0]["createdAt"].is_string());
}

#[tokio::test]
async fn full_report_summary_matches_its_sections() {
    let app = TestApp::new().await;
    let supplier = app.create_supplier(json!({"name": "Acme Components"})).await;
    app.create_item(json!({"name": "Laptop", "sku": "LAP-001", "quantity": 3, "price": 1000}))
        .await;
    app.create_item(json!({
        "name": "Mouse",
        "sku": "MOU-001",
        "quantity": 0,
        "price": 15,
        "supplierId": supplier
    }))
    .await;
    app.create_item(json!({"name": "Desk", "sku": "DSK-001", "quantity": 40, "price": 250}))
        .await;
    let resolved = app
        .create_alert(json!({"itemName": "Laptop", "message": "low"}))
        .await;
    app.create_alert(json!({"itemName": "Mouse", "message": "gone", "type": "Out of Stock"}))
        .await;
    app.call(
        Method::PATCH,
        &format!("/api/alerts/{resolved}/status"),
        Some(json!({"status": "Resolved"})),
    )
    .await;

    let (status, body) = app.call(Method::GET, "/api/reports/full", None).await;
    assert_eq!(status, 200);
    let report = &body["data"];
    assert!(report["timestamp"].is_string());

    let summary = &report["summary"];
    assert_eq!(summary["totalItems"], 3);
    assert_eq!(summary["totalSuppliers"], 1);
    assert_eq!(summary["activeAlerts"], 1);
    assert_eq!(summary["lowStockItems"], 2);
    assert_eq!(summary["outOfStockItems"], 1);

    assert_eq!(report["items"].as_array().map(Vec::len), Some(3));
    assert_eq!(report["suppliers"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["alerts"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn empty_store_gives_zeroed_summary() {
    let app = TestApp::new().await;
    let (status, body) = app.call(Method::GET, "/api/reports/full", None).await;
    assert_eq!(status, 200);
    assert_eq!(
        body["data"]["summary"],
        json!({
            "totalItems": 0,
            "totalSuppliers": 0,
            "activeAlerts": 0,
            "lowStockItems": 0,
            "outOfStockItems": 0
        })
    );
}

#[tokio::test]
async fn health_reports_database_status() {
    let app = TestApp::new().await;
    let (status, body) = app.call(Method::GET, "/health", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "up");
    assert_eq!(body["details"]["database"]["status"], "up");
}

async fn app_without_alerts_table(environment: &str) -> TestApp {
    let app = TestApp::with_config(|cfg| cfg.environment = environment.to_string()).await;
    app.create_item(json!({"name": "Laptop", "sku": "LAP-001", "quantity": 3, "price": 1000}))
        .await;
    app.state
        .db
        .execute_unprepared("DROP TABLE alerts")
        .await
        .expect("drop alerts table");
    app
}

#[tokio::test]
async fn full_report_fails_whole_when_a_section_fails() {
    let app = app_without_alerts_table("production").await;

    let (status, body) = app.call(Method::GET, "/api/reports/full", None).await;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());
    assert_eq!(body["message"], "Internal Server Error");

    // Sections that do not touch alerts still work
    let (status, _) = app.call(Method::GET, "/api/reports/inventory", None).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn report_failure_message_is_shown_outside_production() {
    let app = app_without_alerts_table("development").await;

    let (status, body) = app.call(Method::GET, "/api/reports/full", None).await;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());
    assert_eq!(body["message"], "Failed to generate full report");
}
