use http::{Method, StatusCode};
use serde_json::json;

use crate::db::models::{Product, UserRole};
use crate::db::repository::ProductRepository;
use crate::test_support::{Part, TestApp, fake_public_id};

async fn seed(app: &TestApp, name: &str, cat: &str, price: f64, rating: f64, featured: bool) -> String {
    ProductRepository::new(app.state.db.clone())
        .create(Product {
            name: name.into(),
            cat_id: cat.into(),
            cat_name: format!("{}-name", cat),
            price,
            rating,
            is_featured: featured,
            count_in_stock: 10,
            ..Default::default()
        })
        .await
        .unwrap()
        .id_string()
}

#[tokio::test]
async fn test_create_and_upsert() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;

    let (status, body) = app
        .multipart(
            Method::POST,
            "/api/product/createProduct",
            &[
                Part::Text("name", "Phone"),
                Part::Text("price", "199.5"),
                Part::Text("countInStock", "4"),
                Part::Text("catId", "category:phones"),
                Part::Text("productRam", r#"["4GB","8GB"]"#),
                Part::Text("size[]", "S, M"),
                Part::Text("size[]", "M"),
                Part::File("images", "front.png"),
                Part::File("bannerImages", "banner.png"),
            ],
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let product = &body["data"];
    let id = product["id"].as_str().unwrap().to_string();
    assert_eq!(product["price"], 199.5);
    assert_eq!(product["CatId"], "category:phones");
    assert_eq!(product["productRam"], json!(["4GB", "8GB"]));
    assert_eq!(product["size"], json!(["S", "M"]));
    assert_eq!(product["bannerimages"].as_array().unwrap().len(), 1);

    // Merge: only the posted fields change, new images are appended
    let (status, body) = app
        .multipart(
            Method::POST,
            "/api/product/createProduct",
            &[
                Part::Text("productId", &id),
                Part::Text("price", "150"),
                Part::File("images", "back.png"),
            ],
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["name"], "Phone");
    assert_eq!(body["data"]["price"], 150.0);
    assert_eq!(body["data"]["images"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["productRam"], json!(["4GB", "8GB"]));

    let (status, _) = app
        .multipart(
            Method::POST,
            "/api/product/createProduct",
            &[Part::Text("productId", "product:missing"), Part::Text("price", "1")],
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .multipart(
            Method::POST,
            "/api/product/createProduct",
            &[Part::Text("price", "abc"), Part::Text("name", "X")],
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, user) = app.user("Bob", "bob@example.com", UserRole::User).await;
    let (status, _) = app
        .multipart(
            Method::POST,
            "/api/product/createProduct",
            &[Part::Text("name", "Nope")],
            Some(&user),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_listings_and_pagination() {
    let app = TestApp::new().await;
    seed(&app, "A", "category:a", 10.0, 5.0, true).await;
    seed(&app, "B", "category:a", 50.0, 3.0, false).await;
    seed(&app, "C", "category:b", 30.0, 4.0, false).await;

    let (status, body) = app.get("/api/product/getAllProducts?perPage=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["totalPages"], 2);

    let (status, body) = app.get("/api/product/getAllProducts?page=3&perPage=2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Page not found");

    let (_, body) = app.get("/api/product/getAllProductsByCatId/category:a", None).await;
    assert_eq!(body["data"]["total"], 2);

    let (_, body) = app
        .get("/api/product/getAllProductsByCatName?name=category:b-name", None)
        .await;
    assert_eq!(body["data"]["items"][0]["name"], "C");

    let (status, _) = app.get("/api/product/getAllProductsByCatName", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app
        .get(
            "/api/product/getAllProductsByPrice?catId=category:a&minPrice=20&maxPrice=100",
            None,
        )
        .await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "B");

    let (status, _) = app.get("/api/product/getAllProductsByRating", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app
        .get("/api/product/getAllProductsByRating?catId=category:a", None)
        .await;
    assert_eq!(body["data"]["items"][0]["name"], "A");
    assert_eq!(body["data"]["items"][1]["name"], "B");

    let (_, body) = app.get("/api/product/getAllProductsCount", None).await;
    assert_eq!(body["data"]["productsCount"], 3);

    let (_, body) = app.get("/api/product/getAllFeaturedProducts", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .post(
            "/api/product/filterProducts",
            json!({
                "catId": ["category:b"],
                "subCatId": [],
                "minPrice": 5,
                "maxPrice": 60,
                "rating": [4, 5],
                "page": 1,
                "limit": 10
            }),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "C");
}

#[tokio::test]
async fn test_sort_by() {
    let app = TestApp::new().await;
    let products = json!([
        {"name": "b", "price": 20},
        {"name": "a", "price": 30},
        {"name": "c", "price": 10}
    ]);

    let (status, body) = app
        .post(
            "/api/product/sortBy",
            json!({"products": products, "sortBy": "price", "order": "desc"}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "a");
    assert_eq!(body["data"][2]["name"], "c");

    let (status, _) = app
        .post(
            "/api/product/sortBy",
            json!({"products": products, "sortBy": "colour", "order": "asc"}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;

    let (_, body) = app
        .multipart(
            Method::POST,
            "/api/product/createProduct",
            &[Part::Text("name", "Lamp"), Part::File("images", "lamp.png")],
            Some(&admin),
        )
        .await;
    let lamp = body["data"]["id"].as_str().unwrap().to_string();
    let chair = seed(&app, "Chair", "category:a", 5.0, 1.0, false).await;
    let desk = seed(&app, "Desk", "category:a", 5.0, 1.0, false).await;

    let (status, body) = app
        .put(
            &format!("/api/product/updateProduct/{}", chair),
            json!({"price": 7.5, "isFeatured": true}),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 7.5);
    assert_eq!(body["data"]["isFeatured"], true);

    let (status, _) = app
        .put(
            "/api/product/updateProduct/product:missing",
            json!({"price": 1}),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .put(
            &format!("/api/product/updateProduct/{}", chair),
            json!({"price": -1}),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.delete(&format!("/api/product/{}", lamp), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.media.destroyed().contains(&fake_public_id("lamp.png")));

    let (status, body) = app.get(&format!("/api/product/{}", lamp), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (status, body) = app
        .call(
            Method::DELETE,
            "/api/product/deleteMultiple",
            Some(json!({"ids": [chair, desk]})),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedCount"], 2);
}

#[tokio::test]
async fn test_variant_tables() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;

    let (status, body) = app
        .post("/api/product/productRAMS/create", json!({"name": "8GB"}), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    let ram_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .post("/api/product/productRAMS/create", json!({"name": " "}), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.post("/api/product/productSize/create", json!({"name": "XL"}), Some(&admin))
        .await;

    let (_, body) = app.get("/api/product/ProductRAMS/get", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = app.get("/api/product/ProductWeight/get", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = app
        .put(
            &format!("/api/product/updateProductRAMS/{}", ram_id),
            json!({"name": "16GB"}),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "16GB");

    let (_, body) = app.get(&format!("/api/product/ProductRAMS/{}", ram_id), None).await;
    assert_eq!(body["data"]["name"], "16GB");

    let (status, _) = app
        .delete(&format!("/api/product/productRAMS/{}", ram_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/product/ProductRAMS/{}", ram_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
