//! Checkout through the fake gateway and the gateway return URL.

#![allow(clippy::unwrap_used)]

use pulsepack_integration_tests::{FAKE_SESSION_ID, TestServer, cart_count};

#[tokio::test]
async fn test_checkout_requires_sign_in() {
    let server = TestServer::start().await;
    server.post_form("/cart/add", &[("product_id", "1")]).await;

    let (status, body) = server.post_form("/payment/start", &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains("Welcome back"));
    assert!(server.gateway.amounts().is_empty());
}

#[tokio::test]
async fn test_full_purchase() {
    let server = TestServer::start().await;
    server.sign_up("ada@wave.fm").await;
    server.post_form("/cart/add", &[("product_id", "2")]).await;
    server.post_form("/cart/add", &[("product_id", "3")]).await;

    let (_, body) = server.post_form("/cart/checkout", &[]).await;
    assert!(body.contains("Continue to payment"));
    assert!(body.contains("$44.98"));

    let (status, body) = server.post_form("/payment/start", &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains(FAKE_SESSION_ID));
    assert!(body.contains("checkout.js"));
    let amounts = server.gateway.amounts();
    assert_eq!(amounts.len(), 1);
    assert_eq!(amounts.first().unwrap().to_string(), "$44.98");

    let (status, body) = server.get("/payment/status?order_id=order_abc123").await;
    assert_eq!(status, 200);
    assert!(body.contains("Thank you for your purchase!"));
    assert!(body.contains("order_abc123"));
    assert_eq!(cart_count(&body), Some(0));
}

#[tokio::test]
async fn test_return_url_is_rewritten_to_root() {
    let server = TestServer::start().await;
    let client = reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let resp = client
        .get(server.url("/payment/status?order_id=order_1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("location").unwrap(), "/");
}

#[tokio::test]
async fn test_return_without_order_id_still_completes() {
    let server = TestServer::start().await;
    server.post_form("/cart/add", &[("product_id", "5")]).await;

    let (status, body) = server.get("/payment/status").await;
    assert_eq!(status, 200);
    assert!(body.contains("Thank you for your purchase!"));
    assert!(!body.contains("Your order id is"));
    assert_eq!(cart_count(&body), Some(0));
}

#[tokio::test]
async fn test_checkout_without_gateway() {
    let server = TestServer::start_without_payments().await;
    server.sign_up("ada@wave.fm").await;
    server.post_form("/cart/add", &[("product_id", "1")]).await;
    server.post_form("/cart/checkout", &[]).await;

    let (status, body) = server.post_form("/payment/start", &[]).await;
    assert_eq!(status, 503);
    assert!(body.contains("Payments are not available right now."));
}

#[tokio::test]
async fn test_empty_cart_cannot_be_paid() {
    let server = TestServer::start().await;
    server.sign_up("ada@wave.fm").await;
    server.post_form("/cart/checkout", &[]).await;

    let (status, body) = server.post_form("/payment/start", &[]).await;
    assert_eq!(status, 400);
    assert!(body.contains("Order amount must be greater than zero"));
    assert!(server.gateway.amounts().is_empty());
}

#[tokio::test]
async fn test_cart_change_drops_open_gateway_order() {
    let server = TestServer::start().await;
    server.sign_up("grace@wave.fm").await;
    server.post_form("/cart/add", &[("product_id", "2")]).await;
    server.post_form("/cart/checkout", &[]).await;

    let (_, body) = server.post_form("/payment/start", &[]).await;
    assert!(body.contains(FAKE_SESSION_ID));

    // Back on the shelf, the visitor grows the cart and returns to payment.
    server.post_form("/navigate", &[("page", "home")]).await;
    server.post_form("/cart/add", &[("product_id", "3")]).await;
    let (status, body) = server.post_form("/navigate", &[("page", "payment")]).await;
    assert_eq!(status, 200);
    assert!(!body.contains(FAKE_SESSION_ID));
    assert!(body.contains("Continue to payment"));
    assert!(body.contains("$44.98"));

    let (_, body) = server.post_form("/payment/start", &[]).await;
    assert!(body.contains(FAKE_SESSION_ID));
    let amounts = server.gateway.amounts();
    assert_eq!(amounts.len(), 2);
    assert_eq!(amounts.last().unwrap().to_string(), "$44.98");
}
