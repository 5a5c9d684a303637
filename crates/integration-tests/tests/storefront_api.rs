//! Storefront API tests that need no database.
//!
//! Run with: cargo test -p zeltic-integration-tests

use reqwest::StatusCode;
use serde_json::{Value, json};
use zeltic_integration_tests::TestServer;

fn contact() -> Value {
    json!({
        "name": "Ana",
        "last_name": "Paz",
        "phone": "11 5555 0000",
        "address": "Av. Corrientes 1234",
        "postal_code": "C1043",
    })
}

#[tokio::test]
async fn test_health_echoes_request_id() {
    let server = TestServer::start().await;
    let resp = server
        .client()
        .get(server.url("/health"))
        .header("x-request-id", "edge-42")
        .send()
        .await
        .expect("health request");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-request-id"], "edge-42");
    assert_eq!(resp.headers()["cache-control"], "no-store, max-age=0");
    assert_eq!(resp.text().await.expect("body"), "ok");
}

#[tokio::test]
async fn test_new_session_cart_is_empty() {
    let server = TestServer::start().await;
    let client = server.client();

    let cart: Value = client
        .get(server.url("/api/cart"))
        .send()
        .await
        .expect("cart request")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart, json!({ "items": [], "total": "0.00", "total_items": 0 }));

    let count: Value = client
        .get(server.url("/api/cart/count"))
        .send()
        .await
        .expect("count request")
        .json()
        .await
        .expect("count body");
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_edits_to_absent_lines_are_no_ops() {
    let server = TestServer::start().await;
    let client = server.client();

    for (path, body) in [
        ("/api/cart/update", json!({ "product_id": 7, "size": "32", "quantity": 3 })),
        ("/api/cart/update", json!({ "product_id": 7, "size": "32", "quantity": 0 })),
        ("/api/cart/remove", json!({ "product_id": 7, "size": "32" })),
    ] {
        let resp = client
            .post(server.url(path))
            .json(&body)
            .send()
            .await
            .expect("cart edit");
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
        let cart: Value = resp.json().await.expect("cart body");
        assert_eq!(cart["total_items"], 0, "{path}");
    }

    let resp = client
        .post(server.url("/api/cart/clear"))
        .send()
        .await
        .expect("clear");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_checkout_names_the_first_blank_field() {
    let server = TestServer::start().await;
    let mut body = contact();
    body["phone"] = json!("   ");

    let resp = server
        .client()
        .post(server.url("/api/checkout"))
        .json(&body)
        .send()
        .await
        .expect("checkout");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: Value = resp.json().await.expect("error body");
    assert_eq!(error["error"], "please fill in the phone");
}

#[tokio::test]
async fn test_checkout_with_empty_cart_is_refused() {
    let server = TestServer::start().await;
    let resp = server
        .client()
        .post(server.url("/api/checkout"))
        .json(&contact())
        .send()
        .await
        .expect("checkout");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: Value = resp.json().await.expect("error body");
    assert_eq!(error["error"], "your cart is empty");
}

#[tokio::test]
async fn test_anonymous_requests_to_protected_routes() {
    let server = TestServer::start().await;
    let client = server.client();

    for path in [
        "/api/auth/me",
        "/api/admin/orders",
        "/api/admin/products",
        "/api/admin/inventory/pending",
    ] {
        let resp = client
            .get(server.url(path))
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{path}");
    }

    let resp = client
        .put(server.url("/api/admin/inventory"))
        .json(&json!({ "product_id": 1, "size": "32", "stock": 5 }))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_identity_succeeds() {
    let server = TestServer::start().await;
    let resp = server
        .client()
        .post(server.url("/api/auth/logout"))
        .send()
        .await
        .expect("logout");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_register_rejects_bad_input_before_storing() {
    let server = TestServer::start().await;
    let client = server.client();

    for (email, password, message) in [
        ("not-an-email", "long enough pass", "Invalid email address"),
        ("ana@zeltic.com", "short", "password must be at least 8 characters"),
    ] {
        let resp = client
            .post(server.url("/api/auth/register"))
            .json(&json!({
                "email": email,
                "password": password,
                "first_name": "Ana",
                "last_name": "Paz",
            }))
            .send()
            .await
            .expect("register");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{email}");
        let error: Value = resp.json().await.expect("error body");
        assert_eq!(error["error"], message);
    }

    let resp = client
        .get(server.url("/api/auth/me"))
        .send()
        .await
        .expect("me");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
