use serde_json::json;
use http::StatusCode;

use crate::db::models::UserRole;
use crate::test_support::TestApp;

fn line(product_id: &str) -> serde_json::Value {
    json!({
        "productId": product_id,
        "productTitle": "Phone",
        "price": 20.0,
        "quantity": 2,
        "size": "M"
    })
}

#[tokio::test]
async fn test_add_update_remove() {
    let app = TestApp::new().await;
    let (_, ann) = app.user("Ann", "ann@example.com", UserRole::User).await;
    let (_, bob) = app.user("Bob", "bob@example.com", UserRole::User).await;

    let (status, body) = app.post("/api/cart/add", json!({"price": 1}), Some(&ann)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Provide ProductId");

    let (status, body) = app.post("/api/cart/add", line("product:p1"), Some(&ann)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["subTotal"], 40.0);
    let item_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.post("/api/cart/add", line("product:p1"), Some(&ann)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Item already in Cart");

    // Same product in another user's cart is fine
    let (status, _) = app.post("/api/cart/add", line("product:p1"), Some(&bob)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .put(
            "/api/cart/update-cart-item",
            json!({"_id": item_id, "qty": 3, "subTotal": 60.0}),
            Some(&ann),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 3);
    assert_eq!(body["data"]["size"], "M");

    let (status, _) = app
        .put(
            "/api/cart/update-cart-item",
            json!({"_id": item_id, "qty": 1}),
            Some(&bob),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .delete(&format!("/api/cart/delete-cart-item/{}", item_id), Some(&bob))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "The product in the cart is not found");

    let (status, _) = app
        .delete(&format!("/api/cart/delete-cart-item/{}", item_id), Some(&ann))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/cart/get", Some(&ann)).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_cart_self_or_admin() {
    let app = TestApp::new().await;
    let (ann, ann_token) = app.user("Ann", "ann@example.com", UserRole::User).await;
    let (_, bob_token) = app.user("Bob", "bob@example.com", UserRole::User).await;
    let (_, admin) = app.admin().await;
    let ann_id = ann.id_string();

    app.post("/api/cart/add", line("product:p1"), Some(&ann_token)).await;
    app.post("/api/cart/add", line("product:p2"), Some(&ann_token)).await;

    let (status, _) = app
        .delete(&format!("/api/cart/emptyCart/{}", ann_id), Some(&bob_token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .delete(&format!("/api/cart/emptyCart/{}", ann_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedCount"], 2);

    let (_, body) = app.get("/api/cart/get", Some(&ann_token)).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bare_and_prefixed_product_ids_are_one_item() {
    let app = TestApp::new().await;
    let (_, ann) = app.user("Ann", "ann@example.com", UserRole::User).await;

    let (status, body) = app.post("/api/cart/add", line("product:p1"), Some(&ann)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["productId"], "product:p1");

    let (status, body) = app.post("/api/cart/add", line("p1"), Some(&ann)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Item already in Cart");

    let (status, _) = app.post("/api/cart/add", line("category:p1"), Some(&ann)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/cart/get", Some(&ann)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_body_is_enveloped() {
    let app = TestApp::new().await;
    let (_, ann) = app.user("Ann", "ann@example.com", UserRole::User).await;

    let (status, body) = app
        .post(
            "/api/cart/add",
            json!({"productId": "product:p1", "quantity": "2"}),
            Some(&ann),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], true);
    assert!(body["message"].as_str().unwrap().contains("quantity"));
}
