//! Admin API against a real database.
//!
//! These tests require `TEST_DATABASE_URL` pointing at a scratch database.
//!
//! Run with: cargo test -p zeltic-integration-tests -- --include-ignored

use reqwest::StatusCode;
use serde_json::{Value, json};
use zeltic_core::UserRole;
use zeltic_integration_tests::TestServer;
use zeltic_storefront::config::OrderPersistence;

fn stock_of(product: &Value, size: &str) -> Option<u64> {
    product["inventory"]
        .as_array()?
        .iter()
        .find(|slot| slot["size"] == size)?["stock"]
        .as_u64()
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_customer_is_forbidden_from_admin_routes() {
    let server = TestServer::with_database(OrderPersistence::Local).await;
    let customer = server.signed_in(UserRole::Customer).await;

    let resp = customer
        .get(server.url("/api/admin/orders"))
        .send()
        .await
        .expect("orders");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_product_lifecycle() {
    let server = TestServer::with_database(OrderPersistence::Local).await;
    let admin = server.signed_in(UserRole::Admin).await;

    let resp = admin
        .post(server.url("/api/admin/products"))
        .json(&json!({
            "name": "Recto Gris",
            "price": "$45.00",
            "category": "hombre",
            "tag": "recto",
            "inventory": [{ "size": "32", "stock": 3 }, { "size": "34", "stock": -4 }],
        }))
        .send()
        .await
        .expect("create");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.expect("created body");
    let id = created["id"].as_i64().expect("id");
    assert_eq!(stock_of(&created, "32"), Some(3));
    assert_eq!(stock_of(&created, "34"), Some(0));

    let found: Vec<Value> = admin
        .get(server.url(&format!("/api/admin/products?q={id}")))
        .send()
        .await
        .expect("search")
        .json()
        .await
        .expect("search body");
    assert!(found.iter().any(|p| p["id"] == id));

    let resp = admin
        .patch(server.url(&format!("/api/admin/products/{id}")))
        .json(&json!({ "price": 39.9 }))
        .send()
        .await
        .expect("update");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("updated body");
    assert_eq!(updated["price"], "39.90");
    assert_eq!(updated["name"], "Recto Gris");

    let resp = admin
        .delete(server.url(&format!("/api/admin/products/{id}")))
        .send()
        .await
        .expect("delete");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = server
        .client()
        .get(server.url(&format!("/api/products/{id}")))
        .send()
        .await
        .expect("detail");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = admin
        .delete(server.url(&format!("/api/admin/products/{id}")))
        .send()
        .await
        .expect("delete again");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_stock_edits_apply_in_order_and_clamp() {
    let server = TestServer::with_database(OrderPersistence::Local).await;
    let product = server.create_product("50", &[("32", 1)]).await;
    let admin = server.signed_in(UserRole::Admin).await;

    let resp = admin
        .post(server.url("/api/admin/inventory/batch"))
        .json(&json!({ "edits": [
            { "product_id": product, "size": "32", "stock": 8 },
            { "product_id": product, "size": "34", "stock": -3 },
            { "product_id": product, "size": "32", "stock": 6 },
        ]}))
        .send()
        .await
        .expect("batch");
    assert_eq!(resp.status(), StatusCode::OK);
    let report: Value = resp.json().await.expect("report");
    assert_eq!(report["applied"], 2);

    let detail: Value = server
        .client()
        .get(server.url(&format!("/api/products/{product}")))
        .send()
        .await
        .expect("detail")
        .json()
        .await
        .expect("detail body");
    assert_eq!(stock_of(&detail, "32"), Some(6));
    assert_eq!(stock_of(&detail, "34"), Some(0));
    assert_eq!(detail["sizes"][1]["available"], false);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_batch_stops_at_first_failure() {
    let server = TestServer::with_database(OrderPersistence::Local).await;
    let product = server.create_product("50", &[("M", 1)]).await;
    let admin = server.signed_in(UserRole::Admin).await;

    let resp = admin
        .post(server.url("/api/admin/inventory/batch"))
        .json(&json!({ "edits": [
            { "product_id": product, "size": "M", "stock": 4 },
            { "product_id": i32::MAX, "size": "M", "stock": 1 },
            { "product_id": product, "size": "L", "stock": 2 },
        ]}))
        .send()
        .await
        .expect("batch");
    assert!(resp.status().is_client_error() || resp.status().is_server_error());
    let error: Value = resp.json().await.expect("error body");
    assert_eq!(error["applied"], 1);

    let detail: Value = server
        .client()
        .get(server.url(&format!("/api/products/{product}")))
        .send()
        .await
        .expect("detail")
        .json()
        .await
        .expect("detail body");
    assert_eq!(stock_of(&detail, "M"), Some(4));
    assert_eq!(stock_of(&detail, "L"), None);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_single_stock_set_is_immediate() {
    let server = TestServer::with_database(OrderPersistence::Local).await;
    let product = server.create_product("50", &[("S", 0)]).await;
    let admin = server.signed_in(UserRole::Admin).await;

    let resp = admin
        .put(server.url("/api/admin/inventory"))
        .json(&json!({ "product_id": product, "size": "S", "stock": 2 }))
        .send()
        .await
        .expect("set stock");
    assert_eq!(resp.status(), StatusCode::OK);

    let stepper: Value = server
        .client()
        .get(server.url(&format!("/api/products/{product}/stock?size=S")))
        .send()
        .await
        .expect("stock")
        .json()
        .await
        .expect("stock body");
    assert_eq!(stepper["max"], 2);
    assert_eq!(stepper["can_add_to_cart"], true);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_staged_edits_preview_discard_and_save() {
    let server = TestServer::with_database(OrderPersistence::Local).await;
    let product = server.create_product("50", &[("30", 5)]).await;
    let admin = server.signed_in(UserRole::Admin).await;
    let pending = server.url("/api/admin/inventory/pending");

    for (size, stock) in [("30", 7), ("32", 2), ("30", 9)] {
        let resp = admin
            .put(&pending)
            .json(&json!({ "product_id": product, "size": size, "stock": stock }))
            .send()
            .await
            .expect("stage");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let view: Value = admin
        .get(&pending)
        .send()
        .await
        .expect("pending")
        .json()
        .await
        .expect("pending body");
    assert_eq!(view["edits"].as_array().expect("edits").len(), 2);
    assert_eq!(view["preview"][0]["stock"], 9);
    assert_eq!(view["preview"][1]["size"], "32");

    let view: Value = admin
        .delete(&pending)
        .json(&json!({ "product_id": product, "size": "32" }))
        .send()
        .await
        .expect("discard")
        .json()
        .await
        .expect("discard body");
    assert_eq!(view["edits"], json!([{ "product_id": product, "size": "30", "stock": 9 }]));

    let detail: Value = server
        .client()
        .get(server.url(&format!("/api/products/{product}")))
        .send()
        .await
        .expect("detail")
        .json()
        .await
        .expect("detail body");
    assert_eq!(stock_of(&detail, "30"), Some(5));

    let resp = admin
        .post(server.url("/api/admin/inventory/pending/save"))
        .send()
        .await
        .expect("save");
    assert_eq!(resp.status(), StatusCode::OK);
    let report: Value = resp.json().await.expect("report");
    assert_eq!(report["applied"], 1);

    let detail: Value = server
        .client()
        .get(server.url(&format!("/api/products/{product}")))
        .send()
        .await
        .expect("detail")
        .json()
        .await
        .expect("detail body");
    assert_eq!(stock_of(&detail, "30"), Some(9));
    assert_eq!(stock_of(&detail, "32"), None);

    let resp = admin
        .post(server.url("/api/admin/inventory/pending/save"))
        .send()
        .await
        .expect("save again");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
