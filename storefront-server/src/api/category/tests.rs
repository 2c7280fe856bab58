use http::{Method, StatusCode};

use crate::db::models::UserRole;
use crate::test_support::{Part, TestApp, fake_public_id};

async fn create(app: &TestApp, token: &str, parts: &[Part<'_>]) -> serde_json::Value {
    let (status, body) = app
        .multipart(
            Method::POST,
            "/api/category/uploadImagesCreateCategory",
            parts,
            Some(token),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn test_tree_counts_and_cascade_delete() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;

    let root = create(
        &app,
        &admin,
        &[Part::Text("name", "Fashion"), Part::File("images", "fashion.png")],
    )
    .await;
    let root_id = root["id"].as_str().unwrap().to_string();
    assert_eq!(root["images"].as_array().unwrap().len(), 1);

    let child = create(
        &app,
        &admin,
        &[
            Part::Text("name", "Men"),
            Part::Text("parentId", &root_id),
            Part::Text("parentCatName", "Fashion"),
        ],
    )
    .await;
    let child_id = child["id"].as_str().unwrap().to_string();
    create(
        &app,
        &admin,
        &[
            Part::Text("name", "Shirts"),
            Part::Text("parentId", &child_id),
            Part::File("images", "shirts.png"),
        ],
    )
    .await;
    create(&app, &admin, &[Part::Text("name", "Electronics")]).await;

    let (status, body) = app.get("/api/category", None).await;
    assert_eq!(status, StatusCode::OK);
    let roots = body["data"].as_array().unwrap();
    assert_eq!(roots.len(), 2);
    let fashion = roots.iter().find(|r| r["name"] == "Fashion").unwrap();
    assert_eq!(fashion["children"][0]["name"], "Men");
    assert_eq!(fashion["children"][0]["children"][0]["name"], "Shirts");

    let (_, body) = app.get("/api/category/get/count", None).await;
    assert_eq!(body["data"]["categoryCount"], 2);
    let (_, body) = app.get("/api/category/get/count/subCat", None).await;
    assert_eq!(body["data"]["subCategoryCount"], 2);

    let (_, body) = app.get("/api/category/subcategories", None).await;
    let subs = body["data"].as_array().unwrap();
    let men = subs.iter().find(|s| s["name"] == "Men").unwrap();
    assert_eq!(men["parentCategory"]["name"], "Fashion");
    assert_eq!(men["parentImages"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .delete(&format!("/api/category/{}", root_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/category", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = app.get("/api/category/get/count/subCat", None).await;
    assert_eq!(body["data"]["subCategoryCount"], 0);

    let destroyed = app.media.destroyed();
    assert!(destroyed.contains(&fake_public_id("fashion.png")));
    assert!(destroyed.contains(&fake_public_id("shirts.png")));
}

#[tokio::test]
async fn test_create_requires_admin_and_name() {
    let app = TestApp::new().await;
    let (_, user) = app.user("Bob", "bob@example.com", UserRole::User).await;
    let (status, _) = app
        .multipart(
            Method::POST,
            "/api/category/uploadImagesCreateCategory",
            &[Part::Text("name", "X")],
            Some(&user),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, admin) = app.admin().await;
    let (status, _) = app
        .multipart(
            Method::POST,
            "/api/category/uploadImagesCreateCategory",
            &[Part::Text("parentCatName", "X")],
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_keeps_images_and_get_missing() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let created = create(
        &app,
        &admin,
        &[Part::Text("name", "Bags"), Part::File("images", "bags.png")],
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = app
        .multipart(
            Method::PUT,
            &format!("/api/category/{}", id),
            &[Part::Text("name", "Handbags")],
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Handbags");
    assert_eq!(body["data"]["images"], created["images"]);

    let (status, _) = app.get("/api/category/category:missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_moves_between_parent_and_root() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let root = create(&app, &admin, &[Part::Text("name", "Home")]).await;
    let root_id = root["id"].as_str().unwrap().to_string();
    let child = create(
        &app,
        &admin,
        &[
            Part::Text("name", "Kitchen"),
            Part::Text("parentId", &root_id),
            Part::Text("parentCatName", "Home"),
        ],
    )
    .await;
    let uri = format!("/api/category/{}", child["id"].as_str().unwrap());

    // Fields left out keep the current parent
    let (status, body) = app
        .multipart(Method::PUT, &uri, &[Part::Text("name", "Kitchenware")], Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["parentId"], root_id.as_str());

    let (status, _) = app
        .multipart(Method::PUT, &uri, &[Part::Text("parentId", "")], Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/category/get/count", None).await;
    assert_eq!(body["data"]["categoryCount"], 2);
    let (_, body) = app.get("/api/category", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let own_id = child["id"].as_str().unwrap();
    let (status, _) = app
        .multipart(Method::PUT, &uri, &[Part::Text("parentId", own_id)], Some(&admin))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
