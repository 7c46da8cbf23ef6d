//! API integration tests

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

/// Unique ID so reruns against the same database stay isolated
fn unique_id(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Register a loan for (user, book) through the notify-create-loan endpoint
async fn create_loan(client: &Client, user_id: &str, book_id: &str, book_name: &str) {
    let response = client
        .post(format!("{}/notifications/notify-create-loan", BASE_URL))
        .json(&json!({
            "userId": user_id,
            "emailGuardian": "guardian@example.com",
            "bookId": book_id,
            "bookName": book_name,
            "loanReturn": "2026-09-30"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
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
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_get_notifications_empty_page() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/notifications/users/no-such-user?page=0&size=10",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"].as_array().expect("data is an array").is_empty());
    assert_eq!(body["page"], 0);
    assert_eq!(body["size"], 10);
    assert_eq!(body["totalElements"], 0);
    assert_eq!(body["totalPages"], 0);
}

#[tokio::test]
#[ignore]
async fn test_get_fines_empty_page() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/notifications/users/no-such-user/fines?page=0&size=10",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"].as_array().expect("data is an array").is_empty());
    assert_eq!(body["totalElements"], 0);
}

#[tokio::test]
#[ignore]
async fn test_unseen_count_for_unknown_user() {
    let client = Client::new();

    let response = client
        .get(format!("{}/notifications/count/no-such-user", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["unseenNotifications"], 0);
    assert_eq!(body["activeFines"], 0);
}

#[tokio::test]
#[ignore]
async fn test_notify_create_loan() {
    let client = Client::new();

    let response = client
        .post(format!("{}/notifications/notify-create-loan", BASE_URL))
        .json(&json!({
            "userId": "student-001",
            "emailGuardian": "guardian@example.com",
            "bookId": "book-001",
            "bookName": "El Quijote",
            "loanReturn": "2026-09-30"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "Notification Sent!");

    // The loan must now show up as an ALERT notification for the user
    let response = client
        .get(format!(
            "{}/notifications/users/student-001?page=0&size=10",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let data = body["data"].as_array().expect("data is an array");
    assert!(!data.is_empty());
    assert_eq!(data[0]["notificationType"], "ALERT");
    assert_eq!(data[0]["bookName"], "El Quijote");
}

#[tokio::test]
#[ignore]
async fn test_notify_create_loan_rejects_bad_guardian_email() {
    let client = Client::new();

    let response = client
        .post(format!("{}/notifications/notify-create-loan", BASE_URL))
        .json(&json!({
            "userId": "student-001",
            "emailGuardian": "not-an-email",
            "bookId": "book-002",
            "bookName": "La Celestina",
            "loanReturn": "2026-09-30"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_return_unknown_book_is_not_found() {
    let client = Client::new();

    let response = client
        .post(format!(
            "{}/notifications/notify-return-loan?bookId=no-such-book&returnedInBadCondition=false",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_close_unknown_fine_is_not_found() {
    let client = Client::new();

    let response = client
        .put(format!(
            "{}/notifications/users/fines/00000000-0000-0000-0000-000000000000/close",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_mark_seen_on_unknown_notification_affects_zero_rows() {
    let client = Client::new();

    let response = client
        .put(format!(
            "{}/notifications/mark-seen/00000000-0000-0000-0000-000000000000",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!(0));
}

#[tokio::test]
#[ignore]
async fn test_fine_day_rate_round_trip() {
    let client = Client::new();

    let response = client
        .put(format!("{}/notifications/admin/fines/950/rate", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "Fine updated Correctly");

    let response = client
        .get(format!("{}/notifications/admin/fines/rate", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!("950"));
}

#[tokio::test]
#[ignore]
async fn test_fine_day_rate_out_of_range_is_rejected() {
    let client = Client::new();

    let response = client
        .put(format!("{}/notifications/admin/fines/10001/rate", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let response = client
        .put(format!("{}/notifications/admin/fines/-1/rate", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_pending_fines_listing() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/notifications/admin/fines-pending?page=0&size=15",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"].is_array());
    assert!(body["totalElements"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_pending_fines_by_date_listing() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/notifications/admin/fines/pending-by-date?date=2026-01-01&page=0&size=15",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"].as_array().expect("data is an array").is_empty());
}

#[tokio::test]
#[ignore]
async fn test_sweep_status_listing() {
    let client = Client::new();

    let response = client
        .get(format!("{}/notifications/admin/sweeps", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    for entry in body.as_array().expect("sweep status is an array") {
        assert!(entry["job"].is_string());
        assert!(entry["processed"].is_number());
        assert!(entry["failed"].is_number());
    }
}

#[tokio::test]
#[ignore]
async fn test_open_and_close_fine_flow() {
    let client = Client::new();
    let user_id = unique_id("student");
    let book_id = unique_id("book");

    create_loan(&client, &user_id, &book_id, "Rayuela").await;

    let response = client
        .post(format!(
            "{}/notifications/users/{}/fines/create",
            BASE_URL, user_id
        ))
        .json(&json!({
            "userId": user_id,
            "bookId": book_id,
            "amount": "800",
            "fineType": "LATE",
            "expiredDate": "2026-08-15"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "Fine Created");

    // Exactly one new PENDING fine with the requested amount and type
    let response = client
        .get(format!(
            "{}/notifications/users/{}/fines?page=0&size=10",
            BASE_URL, user_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let data = body["data"].as_array().expect("data is an array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["fineStatus"], "PENDING");
    assert_eq!(data[0]["fineType"], "LATE");
    assert_eq!(data[0]["amount"], "800");
    let fine_id = data[0]["fineId"].as_str().expect("fineId is a string").to_string();

    // A FINE notification was persisted alongside the fine row
    let response = client
        .get(format!(
            "{}/notifications/users/{}?page=0&size=10",
            BASE_URL, user_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    let types: Vec<&str> = body["data"]
        .as_array()
        .expect("data is an array")
        .iter()
        .map(|n| n["notificationType"].as_str().unwrap())
        .collect();
    assert!(types.contains(&"FINE"));

    // Closing flips the status and nothing else
    let response = client
        .put(format!(
            "{}/notifications/users/fines/{}/close",
            BASE_URL, fine_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "Fine Closed");

    let response = client
        .get(format!(
            "{}/notifications/users/{}/fines?page=0&size=10",
            BASE_URL, user_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    let data = body["data"].as_array().expect("data is an array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["fineId"].as_str().unwrap(), fine_id);
    assert_eq!(data[0]["fineStatus"], "CLOSED");
    assert_eq!(data[0]["amount"], "800");
    assert_eq!(data[0]["fineType"], "LATE");
}

#[tokio::test]
#[ignore]
async fn test_mark_seen_returns_one_then_zero() {
    let client = Client::new();
    let user_id = unique_id("student");
    let book_id = unique_id("book");

    create_loan(&client, &user_id, &book_id, "Platero y yo").await;

    let response = client
        .get(format!(
            "{}/notifications/users/{}?page=0&size=10",
            BASE_URL, user_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    let data = body["data"].as_array().expect("data is an array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["seen"], false);
    let notification_id = data[0]["notificationId"].as_str().unwrap().to_string();

    // First call flips the row, second call finds nothing left to flip
    let response = client
        .put(format!(
            "{}/notifications/mark-seen/{}",
            BASE_URL, notification_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!(1));

    let response = client
        .put(format!(
            "{}/notifications/mark-seen/{}",
            BASE_URL, notification_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!(0));

    let response = client
        .get(format!("{}/notifications/count/{}", BASE_URL, user_id))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["unseenNotifications"], 0);
}

#[tokio::test]
#[ignore]
async fn test_open_fine_rejects_mismatched_user() {
    let client = Client::new();

    let response = client
        .post(format!(
            "{}/notifications/users/someone/fines/create",
            BASE_URL
        ))
        .json(&json!({
            "userId": "someone-else",
            "bookId": "book-001",
            "amount": "800",
            "fineType": "LATE",
            "expiredDate": "2026-08-15"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_negative_paging_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/notifications/users/student-001?page=-1&size=10",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let response = client
        .get(format!(
            "{}/notifications/admin/fines-pending?page=0&size=-10",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_open_fine_for_unknown_loan_is_not_found() {
    let client = Client::new();

    let response = client
        .post(format!(
            "{}/notifications/users/no-such-user/fines/create",
            BASE_URL
        ))
        .json(&json!({
            "userId": "no-such-user",
            "bookId": "no-such-book",
            "amount": "800",
            "fineType": "LATE",
            "expiredDate": "2026-08-01"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}
