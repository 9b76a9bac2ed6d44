//! End-to-end route tests against an in-memory SQLite database.

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use migration::{Migrator, MigratorTrait};
use quill_core::domain::{CommentStatus, NewCategory, NewComment, NewPost, Post, PostStatus};
use quill_core::ports::{CategoryRepository, CommentRepository, PostRepository};
use quill_infra::DatabaseConfig;

use super::configure_routes;
use crate::state::AppState;

const TOKEN: &str = "test-admin-token";

async fn test_state() -> web::Data<AppState> {
    let db = quill_infra::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        log_statements: false,
    })
    .await
    .expect("in-memory sqlite");
    Migrator::up(&db, None).await.expect("migrations");

    web::Data::new(AppState::new(db, TOKEN, 100))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(configure_routes)).await
    };
}

/// Send a request and decode the JSON body.
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let res = test::call_service(&$app, $req.to_request()).await;
        let status = res.status();
        let body: Value = test::read_body_json(res).await;
        (status, body)
    }};
}

fn admin() -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {TOKEN}"))
}

async fn seed_post(state: &AppState, title: &str, status: PostStatus) -> Post {
    let post = NewPost::new(title.into(), format!("{title} content"), "Ada".into())
        .unwrap()
        .with_status(status);
    state.posts.create(post).await.unwrap()
}

async fn seed_comment(state: &AppState, post_id: i32, author: &str) -> i32 {
    state
        .comments
        .create(NewComment {
            post_id,
            author_name: author.into(),
            author_email: format!("{}@example.com", author.to_lowercase()),
            content: format!("Comment from {author}"),
        })
        .await
        .unwrap()
        .id
}

#[actix_web::test]
async fn test_health_reports_database() {
    let state = test_state().await;
    let app = app!(state);

    let (status, body) = call!(app, test::TestRequest::get().uri("/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
    assert!(body["version"].is_string());
}

#[actix_web::test]
async fn test_unknown_route_is_json_404() {
    let state = test_state().await;
    let app = app!(state);

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/nothing-here"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Route not found" }));
}

#[actix_web::test]
async fn test_admin_routes_require_token() {
    let state = test_state().await;
    let app = app!(state);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/admin/posts")
            .set_json(json!({ "title": "T", "content": "C", "author": "A" }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri("/api/admin/comments/1")
            .insert_header((header::AUTHORIZATION, "Bearer wrong-token"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call!(app, test::TestRequest::get().uri("/api/admin/comments"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_create_post_sets_published_at_only_when_published() {
    let state = test_state().await;
    let app = app!(state);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(admin())
            .set_json(json!({
                "title": "Hello, World!",
                "content": "First post",
                "author": "Ada",
                "status": "published",
                "tags": "intro,meta",
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["post"]["slug"], "hello-world");
    assert_eq!(body["post"]["excerpt"], "First post");
    assert!(body["post"]["published_at"].is_string());

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(admin())
            .set_json(json!({ "title": "Draft", "content": "Later", "author": "Ada" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["post"]["status"], "draft");
    assert!(body["post"]["published_at"].is_null());
}

#[actix_web::test]
async fn test_invalid_post_is_rejected_with_field_details() {
    let state = test_state().await;
    let app = app!(state);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(admin())
            .set_json(json!({ "content": "No title", "author": "Ada", "status": "live" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["status", "title"]);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(admin())
            .set_json(json!({ "title": "!!!", "content": "Body", "author": "Ada" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "title");

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(admin())
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let posts = state
        .posts
        .list(&Default::default(), quill_core::PageRequest::new(None, None, 10, 100))
        .await
        .unwrap();
    assert_eq!(posts.total, 0);
}

#[actix_web::test]
async fn test_duplicate_slug_conflicts() {
    let state = test_state().await;
    let app = app!(state);
    seed_post(&state, "Same Title", PostStatus::Draft).await;

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(admin())
            .set_json(json!({ "title": "Same title", "content": "Again", "author": "Ada" }))
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_unknown_category_id_is_a_validation_error() {
    let state = test_state().await;
    let app = app!(state);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/admin/posts")
            .insert_header(admin())
            .set_json(json!({
                "title": "Filed",
                "content": "Body",
                "author": "Ada",
                "category_id": 77,
            }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "category_id");
}

#[actix_web::test]
async fn test_public_listing_paginates_published_posts() {
    let state = test_state().await;
    let app = app!(state);
    for title in ["One", "Two", "Three"] {
        seed_post(&state, title, PostStatus::Published).await;
    }
    seed_post(&state, "Hidden", PostStatus::Draft).await;

    let (status, body) = call!(
        app,
        test::TestRequest::get().uri("/api/posts?page=2&limit=2&status=draft")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["pagination"],
        json!({ "page": 2, "limit": 2, "total": 3, "pages": 2 })
    );

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/posts"));
    let titles: Vec<&str> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Three", "Two", "One"]);

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/posts?limit=100000"));
    assert_eq!(body["pagination"]["limit"], 100);

    let (status, _) = call!(app, test::TestRequest::get().uri("/api/posts?page=abc"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_huge_page_returns_empty_listing() {
    let state = test_state().await;
    let app = app!(state);
    seed_post(&state, "Only Post", PostStatus::Published).await;

    let (status, body) = call!(
        app,
        test::TestRequest::get().uri("/api/posts?page=100000000000000000&limit=100")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"], json!([]));
    assert_eq!(body["pagination"]["page"], 100_000_000_000_000_000u64);
    assert_eq!(body["pagination"]["total"], 1);

    let (status, body) = call!(
        app,
        test::TestRequest::get().uri("/api/posts?page=18446744073709551615")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"], json!([]));
}

#[actix_web::test]
async fn test_search_percent_is_not_a_wildcard() {
    let state = test_state().await;
    let app = app!(state);
    seed_post(&state, "Plain Title", PostStatus::Published).await;

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/posts?search=%25"));
    assert_eq!(body["pagination"]["total"], 0);

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/posts?search=_"));
    assert_eq!(body["pagination"]["total"], 0);

    seed_post(&state, "Half 50% Off", PostStatus::Published).await;
    let (_, body) = call!(app, test::TestRequest::get().uri("/api/posts?search=50%25"));
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["posts"][0]["title"], "Half 50% Off");
}

#[actix_web::test]
async fn test_listing_filters_by_category_and_search() {
    let state = test_state().await;
    let app = app!(state);

    let rust = state
        .categories
        .create(NewCategory::new("Rust".into(), None).unwrap())
        .await
        .unwrap();
    let filed = NewPost::new("Ownership Explained".into(), "Borrowing".into(), "Ada".into())
        .unwrap()
        .with_status(PostStatus::Published)
        .with_category(Some(rust.id));
    state.posts.create(filed).await.unwrap();
    seed_post(&state, "Gardening Tips", PostStatus::Published).await;

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/posts?category=rust"));
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["posts"][0]["category_name"], "Rust");
    assert_eq!(body["posts"][0]["category_slug"], "rust");

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/posts?category=nope"));
    assert_eq!(body["pagination"]["total"], 0);
    assert_eq!(body["pagination"]["pages"], 0);
    assert_eq!(body["posts"], json!([]));

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/posts?search=GARDEN"));
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["posts"][0]["slug"], "gardening-tips");

    let (_, body) = call!(
        app,
        test::TestRequest::get().uri("/api/posts?search=%25%27%3B%20DROP%20TABLE%20posts%3B--")
    );
    assert_eq!(body["pagination"]["total"], 0);
}

#[actix_web::test]
async fn test_admin_listing_sees_drafts() {
    let state = test_state().await;
    let app = app!(state);
    seed_post(&state, "Public", PostStatus::Published).await;
    let draft = seed_post(&state, "Private", PostStatus::Draft).await;

    let (_, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/admin/posts?status=draft")
            .insert_header(admin())
    );
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["posts"][0]["id"], draft.id);

    let (_, body) = call!(
        app,
        test::TestRequest::get().uri("/api/admin/posts").insert_header(admin())
    );
    assert_eq!(body["pagination"]["total"], 2);

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/admin/posts/{}", draft.id))
            .insert_header(admin())
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "Private");

    let (status, _) = call!(app, test::TestRequest::get().uri("/api/posts/private"));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_update_title_changes_slug_not_created_at() {
    let state = test_state().await;
    let app = app!(state);
    let post = seed_post(&state, "Old Title", PostStatus::Draft).await;

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/admin/posts/{}", post.id))
            .insert_header(admin())
            .set_json(json!({ "title": "New Title", "status": "published" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["slug"], "new-title");
    assert_eq!(body["post"]["content"], "Old Title content");
    assert!(body["post"]["published_at"].is_string());

    let updated = state.posts.find_published_by_slug("new-title").await.unwrap().unwrap();
    assert_eq!(updated.created_at, post.created_at);
    assert!(updated.updated_at >= post.updated_at);

    let (status, _) = call!(
        app,
        test::TestRequest::put()
            .uri("/api/admin/posts/9999")
            .insert_header(admin())
            .set_json(json!({ "title": "Ghost" }))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_update_can_clear_category_and_image() {
    let state = test_state().await;
    let app = app!(state);
    let rust = state
        .categories
        .create(NewCategory::new("Rust".into(), None).unwrap())
        .await
        .unwrap();
    let post = NewPost::new("Filed".into(), "Body".into(), "Ada".into())
        .unwrap()
        .with_category(Some(rust.id))
        .with_featured_image(Some("https://example.com/a.png".into()))
        .with_tags(Some("rust".into()));
    let post = state.posts.create(post).await.unwrap();

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/admin/posts/{}", post.id))
            .insert_header(admin())
            .set_json(json!({ "category_id": null, "featured_image": null }))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(body["post"]["category_id"].is_null());
    assert!(body["post"]["category_name"].is_null());
    assert!(body["post"]["featured_image"].is_null());
    assert_eq!(body["post"]["tags"], "rust");

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/admin/posts/{}", post.id))
            .insert_header(admin())
            .set_json(json!({ "category_id": rust.id }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["category_slug"], "rust");
}

#[actix_web::test]
async fn test_deleting_post_removes_comments() {
    let state = test_state().await;
    let app = app!(state);
    let post = seed_post(&state, "Doomed", PostStatus::Published).await;
    let comment_id = seed_comment(&state, post.id, "Grace").await;

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/admin/posts/{}", post.id))
            .insert_header(admin())
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call!(app, test::TestRequest::get().uri("/api/posts/doomed"));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/admin/posts/{}", post.id))
            .insert_header(admin())
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/admin/comments/{comment_id}/status"))
            .insert_header(admin())
            .set_json(json!({ "status": "approved" }))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_comments_only_on_published_posts() {
    let state = test_state().await;
    let app = app!(state);
    let draft = seed_post(&state, "Draft", PostStatus::Draft).await;

    let comment = json!({
        "author_name": "Grace",
        "author_email": "grace@example.com",
        "content": "First!",
    });

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{}/comments", draft.id))
            .set_json(&comment)
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts/4242/comments")
            .set_json(&comment)
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts/{}/comments", draft.id))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = call!(
        app,
        test::TestRequest::get().uri("/api/admin/comments").insert_header(admin())
    );
    assert_eq!(body["pagination"]["total"], 0);
}

#[actix_web::test]
async fn test_comment_validation() {
    let state = test_state().await;
    let app = app!(state);
    let post = seed_post(&state, "Open", PostStatus::Published).await;

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{}/comments", post.id))
            .set_json(json!({
                "author_name": "",
                "author_email": "not-an-email",
                "content": "x".repeat(1001),
            }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"].as_array().unwrap().len(), 3);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/posts/{}/comments", post.id))
            .set_json(json!({
                "post_id": post.id + 1,
                "author_name": "Grace",
                "author_email": "grace@example.com",
                "content": "Hello",
            }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "post_id");
}

#[actix_web::test]
async fn test_moderation_flow() {
    let state = test_state().await;
    let app = app!(state);
    let post = seed_post(&state, "Discussed", PostStatus::Published).await;

    let mut ids = Vec::new();
    for author in ["Ada", "Grace", "Linus"] {
        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri(&format!("/api/posts/{}/comments", post.id))
                .set_json(json!({
                    "author_name": author,
                    "author_email": "reader@example.com",
                    "content": format!("{author} says hi"),
                }))
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["comment"]["status"], "pending");
        assert!(body["comment"].get("author_email").is_none());
        ids.push(body["comment"]["id"].as_i64().unwrap());
    }

    let (_, body) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts/{}/comments", post.id))
    );
    assert_eq!(body["pagination"]["total"], 0);

    let (_, body) = call!(
        app,
        test::TestRequest::get().uri("/api/admin/comments").insert_header(admin())
    );
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["comments"][0]["author_email"], "reader@example.com");

    for (id, status) in [(ids[2], "approved"), (ids[0], "approved"), (ids[1], "rejected")] {
        let (code, body) = call!(
            app,
            test::TestRequest::put()
                .uri(&format!("/api/admin/comments/{id}/status"))
                .insert_header(admin())
                .set_json(json!({ "status": status }))
        );
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["comment"]["status"], status);
    }

    let (status, _) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/admin/comments/{}/status", ids[0]))
            .insert_header(admin())
            .set_json(json!({ "status": "spam" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = call!(
        app,
        test::TestRequest::get().uri(&format!("/api/posts/{}/comments", post.id))
    );
    let authors: Vec<&str> = body["comments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["author_name"].as_str().unwrap())
        .collect();
    assert_eq!(authors, ["Ada", "Linus"]);
    assert!(body["comments"][0].get("author_email").is_none());

    let (_, body) = call!(
        app,
        test::TestRequest::get().uri("/api/posts/discussed?include_comments=true")
    );
    assert_eq!(body["comments"].as_array().unwrap().len(), 2);

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/posts/discussed"));
    assert!(body.get("comments").is_none());

    let (_, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/admin/comments?status=rejected")
            .insert_header(admin())
    );
    assert_eq!(body["pagination"]["total"], 1);

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/admin/comments/{}", ids[1]))
            .insert_header(admin())
    );
    assert_eq!(status, StatusCode::OK);
    let remaining = state.comments.approved_for_post(post.id).await.unwrap();
    assert!(remaining.iter().all(|c| c.status == CommentStatus::Approved));
}

#[actix_web::test]
async fn test_category_lifecycle() {
    let state = test_state().await;
    let app = app!(state);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/admin/categories")
            .insert_header(admin())
            .set_json(json!({ "name": "Systems Programming", "description": "Low level" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["category"]["slug"], "systems-programming");
    let category_id = body["category"]["id"].as_i64().unwrap() as i32;

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/admin/categories")
            .insert_header(admin())
            .set_json(json!({ "name": "Systems Programming" }))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let published = NewPost::new("Kernel".into(), "Body".into(), "Ada".into())
        .unwrap()
        .with_status(PostStatus::Published)
        .with_category(Some(category_id));
    let post = state.posts.create(published).await.unwrap();
    let draft = NewPost::new("Unfinished".into(), "Body".into(), "Ada".into())
        .unwrap()
        .with_category(Some(category_id));
    state.posts.create(draft).await.unwrap();

    let (_, body) = call!(app, test::TestRequest::get().uri("/api/categories"));
    assert_eq!(body["categories"].as_array().unwrap().len(), 1);
    assert_eq!(body["categories"][0]["post_count"], 1);
    assert_eq!(body["categories"][0]["name"], "Systems Programming");

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/admin/categories/{category_id}"))
            .insert_header(admin())
            .set_json(json!({ "name": "Systems" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"]["slug"], "systems");
    assert_eq!(body["category"]["description"], "Low level");

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/admin/categories/{category_id}"))
            .insert_header(admin())
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/posts/kernel"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["id"], post.id);
    assert!(body["post"]["category_id"].is_null());

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/admin/categories/{category_id}"))
            .insert_header(admin())
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}
