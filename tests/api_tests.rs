//! API integration tests
//!
//! These run against a live server with a fresh database and the default
//! bootstrap admin (`admin` / `admin123`).

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an admin token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Serial number that does not clash with earlier runs
fn unique_serial(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

async fn create_asset(client: &Client, token: &str, serial: &str) -> reqwest::Response {
    client
        .post(format!("{}/assets", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "name": "ThinkPad X1",
            "asset_type": "Laptop",
            "serial_number": serial,
            "purchase_price": "2000.00",
            "current_value": "1500.00"
        }))
        .send()
        .await
        .expect("Failed to send request")
}

async fn log_maintenance(client: &Client, token: &str, asset_id: i64, kind: &str) -> Value {
    let response = client
        .post(format!("{}/maintenance", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "asset_id": asset_id,
            "maintenance_date": chrono::Utc::now().date_naive(),
            "maintenance_type": kind,
            "description": "integration test"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_repair_then_routine_cycles_status() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = create_asset(&client, &token, &unique_serial("SN123")).await;
    assert_eq!(response.status(), 201);
    let asset: Value = response.json().await.expect("Failed to parse response");
    let asset_id = asset["id"].as_i64().expect("No asset id");
    assert_eq!(asset["status"], "available");

    let outcome = log_maintenance(&client, &token, asset_id, "repair").await;
    assert_eq!(outcome["previous_status"], "available");
    assert_eq!(outcome["new_status"], "under_maintenance");

    let outcome = log_maintenance(&client, &token, asset_id, "routine").await;
    assert_eq!(outcome["new_status"], "available");

    let details: Value = client
        .get(format!("{}/assets/{}", BASE_URL, asset_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(details["maintenance_count"], 2);
    assert_eq!(details["status"], "available");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_serial_is_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let serial = unique_serial("DUP");

    let first = create_asset(&client, &token, &serial).await;
    assert_eq!(first.status(), 201);

    let second = create_asset(&client, &token, &serial).await;
    assert_eq!(second.status(), 409);
    let body: Value = second.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Duplicate");
}

#[tokio::test]
#[ignore]
async fn test_quick_status_update_logs_repair() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let asset: Value = create_asset(&client, &token, &unique_serial("QS"))
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let asset_id = asset["id"].as_i64().expect("No asset id");

    let response = client
        .put(format!("{}/assets/{}/status", BASE_URL, asset_id))
        .bearer_auth(&token)
        .json(&json!({ "status": "retired", "notes": "end of life" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let records: Value = client
        .get(format!("{}/maintenance?asset_id={}", BASE_URL, asset_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(records[0]["maintenance_type"], "repair");
    assert_eq!(
        records[0]["description"],
        "Asset status changed to: Retired. Notes: end of life"
    );
}

#[tokio::test]
#[ignore]
async fn test_admin_cannot_delete_self() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let response = client
        .delete(format!("{}/users/{}", BASE_URL, me["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_categorical_report_percentages() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let report: Value = client
        .get(format!("{}/reports/categorical", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let statuses = report["by_status"].as_array().expect("No status breakdown");
    assert_eq!(statuses.len(), 4);
    if report["total_assets"].as_i64().unwrap_or(0) > 0 {
        let sum: f64 = statuses.iter().filter_map(|s| s["percentage"].as_f64()).sum();
        assert!((sum - 100.0).abs() < 0.01);
    }
}
