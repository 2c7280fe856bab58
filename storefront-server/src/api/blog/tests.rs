use http::{Method, StatusCode};
use serde_json::json;

use crate::db::models::UserRole;
use crate::test_support::{Part, TestApp, fake_public_id};

async fn create(app: &TestApp, token: &str, title: &str, image: &str) -> String {
    let (status, body) = app
        .multipart(
            Method::POST,
            "/api/blog/createBlog",
            &[
                Part::Text("title", title),
                Part::Text("description", "<p>hello</p>"),
                Part::File("images", image),
            ],
            Some(token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_requires_admin_and_image() {
    let app = TestApp::new().await;
    let (_, user) = app.user("Bob", "bob@example.com", UserRole::User).await;
    let (status, _) = app
        .multipart(
            Method::POST,
            "/api/blog/createBlog",
            &[Part::Text("title", "T"), Part::File("images", "t.png")],
            Some(&user),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, admin) = app.admin().await;
    let (status, _) = app
        .multipart(
            Method::POST,
            "/api/blog/createBlog",
            &[Part::Text("title", "T")],
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_count_and_get() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let first = create(&app, &admin, "First", "1.png").await;
    create(&app, &admin, "Second", "2.png").await;

    let (status, body) = app.get("/api/blog/getAllBlogs?page=1&perPage=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["totalPages"], 2);

    let (status, _) = app.get("/api/blog/getAllBlogs?page=5&perPage=1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/blog/getBlogsCount", None).await;
    assert_eq!(body["data"]["blogsCount"], 2);

    let (_, body) = app.get(&format!("/api/blog/{}", first), None).await;
    assert_eq!(body["data"]["title"], "First");
}

#[tokio::test]
async fn test_update_keeps_images_then_delete() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin().await;
    let id = create(&app, &admin, "Draft", "cover.png").await;

    let (status, body) = app
        .multipart(
            Method::PUT,
            &format!("/api/blog/updateBlog/{}", id),
            &[Part::Text("title", "Published")],
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Published");
    assert_eq!(body["data"]["description"], "<p>hello</p>");
    assert_eq!(body["data"]["images"].as_array().unwrap().len(), 1);

    let other = create(&app, &admin, "Other", "other.png").await;
    let (status, body) = app
        .call(
            Method::DELETE,
            "/api/blog/deleteMultiple",
            Some(json!({"ids": [id, other]})),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedCount"], 2);
    let destroyed = app.media.destroyed();
    assert!(destroyed.contains(&fake_public_id("cover.png")));
    assert!(destroyed.contains(&fake_public_id("other.png")));

    let (status, body) = app.get(&format!("/api/blog/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Blog not found");
}
