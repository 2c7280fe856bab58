use http::StatusCode;
use serde_json::json;

use crate::db::models::{Product, UserRole};
use crate::db::repository::ProductRepository;
use crate::test_support::TestApp;

#[tokio::test]
async fn test_create_decrements_stock() {
    let app = TestApp::new().await;
    let (_, ann) = app.user("Ann", "ann@example.com", UserRole::User).await;
    let products = ProductRepository::new(app.state.db.clone());
    let phone = products
        .create(Product {
            name: "Phone".into(),
            count_in_stock: 3,
            ..Default::default()
        })
        .await
        .unwrap()
        .id_string();

    let (status, body) = app
        .post("/api/order/create", json!({"products": [], "totalAmt": 0}), Some(&ann))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Order has no products");

    let (status, body) = app
        .post(
            "/api/order/create",
            json!({
                "products": [
                    {"productId": phone, "productTitle": "Phone", "quantity": 5, "price": 10, "size": "M", "brand": "Acme"},
                    {"productId": "product:gone", "quantity": 1}
                ],
                "paymentId": "pay_1",
                "payment_status": "COMPLETE",
                "totalAmt": 60
            }),
            Some(&ann),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["order_status"], "pending");
    assert_eq!(body["data"]["products"][0]["size"], "M");
    assert_eq!(body["data"]["products"][0]["brand"], "Acme");

    let stock = products.find_by_id(&phone).await.unwrap().unwrap().count_in_stock;
    assert_eq!(stock, 0);
}

#[tokio::test]
async fn test_order_list_and_status() {
    let app = TestApp::new().await;
    let (_, ann) = app.user("Ann", "ann@example.com", UserRole::User).await;
    let (_, bob) = app.user("Bob", "bob@example.com", UserRole::User).await;
    let (_, admin) = app.admin().await;

    let mut order_id = String::new();
    for amt in [10, 20, 30] {
        let (_, body) = app
            .post(
                "/api/order/create",
                json!({"products": [{"productId": "product:x", "quantity": 1}], "totalAmt": amt}),
                Some(&ann),
            )
            .await;
        order_id = body["data"]["id"].as_str().unwrap().to_string();
    }

    let (status, body) = app.get("/api/order/Order-list?page=1&limit=2", Some(&ann)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["orderlist"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["data"]["pagination"],
        json!({"totalOrders": 3, "totalPages": 2, "currentPage": 1, "limit": 2})
    );

    let (_, body) = app.get("/api/order/Order-list", Some(&bob)).await;
    assert!(body["data"]["orderlist"].as_array().unwrap().is_empty());

    let uri = format!("/api/order/Order-status/{}", order_id);
    let (status, _) = app.put(&uri, json!({"order_status": "shipped"}), Some(&ann)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.put(&uri, json!({"order_status": "shipped"}), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order_status"], "shipped");

    let (status, _) = app
        .put(
            "/api/order/Order-status/orders:missing",
            json!({"order_status": "shipped"}),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reports() {
    let app = TestApp::new().await;
    let (_, ann) = app.user("Ann", "ann@example.com", UserRole::User).await;
    let (_, admin) = app.admin().await;
    for amt in [10.5, 20.0] {
        app.post(
            "/api/order/create",
            json!({"products": [{"productId": "product:x", "quantity": 1}], "totalAmt": amt}),
            Some(&ann),
        )
        .await;
    }

    let (status, _) = app.get("/api/order/sales", Some(&ann)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/api/order/sales", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalSales"], 30.5);
    let monthly = body["data"]["monthlySales"].as_array().unwrap();
    assert_eq!(monthly.len(), 12);
    let month_sum: f64 = monthly.iter().map(|m| m["totalSales"].as_f64().unwrap()).sum();
    assert_eq!(month_sum, 30.5);

    let (_, body) = app.get("/api/order/users", Some(&admin)).await;
    assert_eq!(body["data"]["totalUsers"], 2);
    let monthly = body["data"]["monthlyUsers"].as_array().unwrap();
    let month_sum: u64 = monthly.iter().map(|m| m["TotalUsers"].as_u64().unwrap()).sum();
    assert_eq!(month_sum, 2);
}
