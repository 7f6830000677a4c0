//! API integration tests
//!
//! Expect a running server with a bootstrap admin, e.g.
//! `LIBRARY_ADMIN__EMAIL=admin@library.local LIBRARY_ADMIN__PASSWORD=admin123 cargo run`

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api";

fn admin_credentials() -> (String, String) {
    let email = std::env::var("LIBRARY_ADMIN__EMAIL").unwrap_or_else(|_| "admin@library.local".to_string());
    let password = std::env::var("LIBRARY_ADMIN__PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    (email, password)
}

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

async fn login(client: &Client, email: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Register a fresh reader and return (email, token)
async fn register_reader(client: &Client, name: &str) -> (String, String) {
    let email = unique_email(name);
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "name": name, "email": email, "password": "secret123" }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let token = login(client, &email, "secret123").await;
    (email, token)
}

async fn admin_token(client: &Client) -> String {
    let (email, password) = admin_credentials();
    login(client, &email, &password).await
}

async fn create_book(client: &Client, admin: &str, title: &str) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({ "title": title, "author": "Test Author", "category": "Testing" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["availability"], true);
    body["id"].as_i64().expect("No book id")
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
async fn test_register_and_login() {
    let client = Client::new();
    let email = unique_email("reader");

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "name": "Reader", "email": email, "password": "secret123" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "User registered successfully!");

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "secret123" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["role"], "USER");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
#[ignore]
async fn test_register_duplicate_email() {
    let client = Client::new();
    let (email, _) = register_reader(&client, "dup").await;

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "name": "Again", "email": email, "password": "secret123" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();
    let (email, _) = register_reader(&client, "wrongpass").await;

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/users/profile", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_reader_cannot_manage_books() {
    let client = Client::new();
    let (_, token) = register_reader(&client, "nonadmin").await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "title": "Forbidden", "author": "Nobody" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .get(format!("{}/admin/users", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_issue_and_return_flow() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let book_id = create_book(&client, &admin, "Circulation Test").await;
    let (_, alice) = register_reader(&client, "alice").await;
    let (_, bob) = register_reader(&client, "bob").await;

    // Alice borrows the book
    let response = client
        .post(format!("{}/books/{}/issue", BASE_URL, book_id))
        .bearer_auth(&alice)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let record: Value = response.json().await.expect("Failed to parse response");
    assert!(record["returnDate"].is_null());

    // Book is no longer available
    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(book["availability"], false);

    // Bob cannot borrow it, nor return it
    let response = client
        .post(format!("{}/books/{}/issue", BASE_URL, book_id))
        .bearer_auth(&bob)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .post(format!("{}/books/{}/return", BASE_URL, book_id))
        .bearer_auth(&bob)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Alice returns it
    let response = client
        .post(format!("{}/books/{}/return", BASE_URL, book_id))
        .bearer_auth(&alice)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let record: Value = response.json().await.expect("Failed to parse response");
    assert!(record["returnDate"].is_string());

    // History shows the returned record
    let issues: Value = client
        .get(format!("{}/users/issues", BASE_URL))
        .bearer_auth(&alice)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let issues = issues.as_array().expect("Expected an array");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["bookTitle"], "Circulation Test");

    // A returned book on time carries no fine
    let fines: Value = client
        .get(format!("{}/payments/fines", BASE_URL))
        .bearer_auth(&alice)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(fines.as_array().map(Vec::len), Some(0));

    // Bob can borrow it now
    let response = client
        .post(format!("{}/books/{}/issue", BASE_URL, book_id))
        .bearer_auth(&bob)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
#[ignore]
async fn test_pay_unknown_fine() {
    let client = Client::new();
    let (_, token) = register_reader(&client, "payer").await;

    let response = client
        .post(format!("{}/payments/pay", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "fineId": 999_999_999, "amount": "1.00", "paymentMethod": "card" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_change_password() {
    let client = Client::new();
    let (email, token) = register_reader(&client, "pwchange").await;

    let response = client
        .put(format!("{}/users/password", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "currentPassword": "wrong-password", "newPassword": "newsecret1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .put(format!("{}/users/password", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "currentPassword": "secret123", "newPassword": "newsecret1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    login(&client, &email, "newsecret1").await;
}

#[tokio::test]
#[ignore]
async fn test_admin_deletes_user_with_open_issue() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let book_id = create_book(&client, &admin, "Cascade Test").await;
    let (email, token) = register_reader(&client, "leaver").await;

    let response = client
        .post(format!("{}/books/{}/issue", BASE_URL, book_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let users: Value = client
        .get(format!("{}/admin/users", BASE_URL))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let user_id = users
        .as_array()
        .and_then(|users| users.iter().find(|u| u["email"] == email.as_str()))
        .and_then(|u| u["id"].as_i64())
        .expect("Registered user not listed");

    let response = client
        .delete(format!("{}/admin/users/{}", BASE_URL, user_id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The book went back on the shelf
    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(book["availability"], true);
}

#[tokio::test]
#[ignore]
async fn test_reports_are_pdf() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    for path in ["issuance", "overdue"] {
        let response = client
            .get(format!("{}/reports/{}", BASE_URL, path))
            .bearer_auth(&admin)
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/pdf");
        let bytes = response.bytes().await.expect("Failed to read body");
        assert!(bytes.starts_with(b"%PDF"));
    }
}

async fn user_id_by_email(client: &Client, admin: &str, email: &str) -> i64 {
    let users: Value = client
        .get(format!("{}/admin/users", BASE_URL))
        .bearer_auth(admin)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    users
        .as_array()
        .and_then(|users| users.iter().find(|u| u["email"] == email))
        .and_then(|u| u["id"].as_i64())
        .expect("User not listed")
}

#[tokio::test]
#[ignore]
async fn test_demoted_admin_token_is_rejected() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (email, _) = register_reader(&client, "deputy").await;
    let deputy_id = user_id_by_email(&client, &admin, &email).await;

    let response = client
        .put(format!("{}/admin/users/{}/role", BASE_URL, deputy_id))
        .bearer_auth(&admin)
        .json(&json!({ "role": "ADMIN" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    // token minted while the role is ADMIN
    let deputy = login(&client, &email, "secret123").await;
    let response = client
        .get(format!("{}/reports/issuance", BASE_URL))
        .bearer_auth(&deputy)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .put(format!("{}/admin/users/{}/role", BASE_URL, deputy_id))
        .bearer_auth(&admin)
        .json(&json!({ "role": "USER" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    for path in ["admin/users", "reports/issuance"] {
        let response = client
            .get(format!("{}/{}", BASE_URL, path))
            .bearer_auth(&deputy)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    let response = client
        .delete(format!("{}/admin/users/{}", BASE_URL, deputy_id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{}/admin/users", BASE_URL))
        .bearer_auth(&deputy)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_token_survives_email_change() {
    let client = Client::new();
    let (_, token) = register_reader(&client, "renamed").await;
    let new_email = unique_email("renamed-new");

    let response = client
        .put(format!("{}/users/profile", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": "Renamed", "email": new_email }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/users/profile", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], new_email.as_str());
}
