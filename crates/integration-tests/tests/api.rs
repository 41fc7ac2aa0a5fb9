//! JSON API used by external clients.

#![allow(clippy::unwrap_used)]

use pulsepack_integration_tests::{FAKE_SESSION_ID, TestServer};
use serde_json::{Value, json};

async fn post_json(server: &TestServer, path: &str, body: &Value) -> (u16, Value) {
    let resp = server
        .client
        .post(server.url(path))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

async fn get_json(server: &TestServer, path: &str) -> (u16, Value) {
    let resp = server.client.get(server.url(path)).send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

fn signup_body(email: &str) -> Value {
    json!({
        "email": email,
        "password": "correct-horse-battery",
        "firstName": "Kofi",
        "lastName": "Mensah"
    })
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;

    let (status, body) = get_json(&server, "/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["message"], "Backend is running");
}

#[tokio::test]
async fn test_signup_login_and_lookup() {
    let server = TestServer::start().await;

    let (status, body) = post_json(&server, "/api/signup", &signup_body("kofi@wave.fm")).await;
    assert_eq!(status, 201);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["firstName"], "Kofi");
    let uid = body["user"]["uid"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &server,
        "/api/login",
        &json!({"email": "kofi@wave.fm", "password": "correct-horse-battery"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["uid"], uid.as_str());

    let (status, body) = get_json(&server, &format!("/api/user/{uid}")).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "kofi@wave.fm");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"]["createdAt"].is_string());
}

#[tokio::test]
async fn test_credential_errors() {
    let server = TestServer::start().await;
    post_json(&server, "/api/signup", &signup_body("kofi@wave.fm")).await;

    let (status, body) = post_json(&server, "/api/signup", &signup_body("kofi@wave.fm")).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "Email already exists");

    let (status, body) = post_json(&server, "/api/login", &json!({"email": "kofi@wave.fm"})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Email and password are required");

    let (status, body) = post_json(
        &server,
        "/api/login",
        &json!({"email": "kofi@wave.fm", "password": "not-the-password"}),
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_unknown_user() {
    let server = TestServer::start().await;

    let (status, body) = get_json(&server, "/api/user/not-a-uid").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_create_order() {
    let server = TestServer::start().await;
    let (_, body) = post_json(&server, "/api/signup", &signup_body("kofi@wave.fm")).await;
    let uid = body["user"]["uid"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &server,
        "/api/create_order",
        &json!({"uid": uid, "amount": 49.5}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["payment_session_id"], FAKE_SESSION_ID);
    assert_eq!(server.gateway.amounts().len(), 1);

    let (status, body) = post_json(&server, "/api/create_order", &json!({"uid": uid})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "User ID and amount are required");

    let (status, body) = post_json(
        &server,
        "/api/create_order",
        &json!({"uid": uid, "amount": 0}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Order amount must be greater than zero");
}

#[tokio::test]
async fn test_create_order_without_gateway() {
    let server = TestServer::start_without_payments().await;
    let (_, body) = post_json(&server, "/api/signup", &signup_body("kofi@wave.fm")).await;
    let uid = body["user"]["uid"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &server,
        "/api/create_order",
        &json!({"uid": uid, "amount": 10}),
    )
    .await;
    assert_eq!(status, 503);
    assert_eq!(body["error"], "Payments are not available");
}

#[tokio::test]
async fn test_payment_status_echoes_order_id() {
    let server = TestServer::start().await;

    let (status, body) = get_json(&server, "/api/payment/status?order_id=order_77").await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Payment status check page");
    assert_eq!(body["order_id"], "order_77");
}
