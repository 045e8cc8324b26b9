/// End-to-end tests for the to-do routes
///
/// Drives the real router (auth layer, handlers, error mapping) over the
/// in-memory repository and the recording cache invalidator.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{json_body, TestContext};
use serde_json::json;
use todolist_shared::cache::list_view_cache_key;
use todolist_shared::repository::TodoRepository;

async fn create(ctx: &TestContext, user_key: i64, title: &str, content: &str) {
    let response = ctx
        .send(
            "POST",
            "/todo",
            user_key,
            Some(json!({ "title": title, "content": content })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_then_list() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            "POST",
            "/todo",
            1,
            Some(json!({ "title": "Example Title", "content": "Example Content" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "msg": "Create successfully",
            "data": { "title": "Example Title", "content": "Example Content" }
        })
    );

    let response = ctx.send("GET", "/todo", 1, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "msg": "success",
            "data": [{ "title": "Example Title", "content": "Example Content", "key": "1" }]
        })
    );
}

#[tokio::test]
async fn test_get_second_of_two() {
    let ctx = TestContext::new();
    create(&ctx, 1, "First", "one").await;
    create(&ctx, 1, "Second", "two").await;

    let response = ctx.send("GET", "/todo/2", 1, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "msg": "success", "data": { "title": "Second", "content": "two", "key": "2" } })
    );
}

#[tokio::test]
async fn test_delete_hides_note_but_keeps_row() {
    let ctx = TestContext::new();
    create(&ctx, 1, "First", "one").await;
    create(&ctx, 1, "Second", "two").await;

    let response = ctx.send("DELETE", "/todo/2", 1, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "msg": "Delete successfully" }));

    let response = ctx.send("GET", "/todo", 1, None).await;
    let body = json_body(response).await;
    let keys: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["1"]);

    let response = ctx.send("GET", "/todo/2", 1, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let row = ctx.repo.find_by_key_with_deleted(2).await.unwrap().unwrap();
    assert!(row.deleted_at.is_some());
    assert_eq!(ctx.repo.row_count().await, 2);
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let ctx = TestContext::new();
    create(&ctx, 1, "Only", "one").await;

    let response = ctx.send("DELETE", "/todo/1", 1, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx.send("DELETE", "/todo/1", 1, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Todo is not found.");
}

#[tokio::test]
async fn test_partial_update_keeps_other_field() {
    let ctx = TestContext::new();
    create(&ctx, 1, "Old title", "Kept content").await;

    let response = ctx
        .send("PUT", "/todo/1", 1, Some(json!({ "title": "New title" })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "msg": "Update successfully" }));

    let body = json_body(ctx.send("GET", "/todo/1", 1, None).await).await;
    assert_eq!(body["data"]["title"], "New title");
    assert_eq!(body["data"]["content"], "Kept content");
}

#[tokio::test]
async fn test_update_without_fields_succeeds() {
    let ctx = TestContext::new();
    create(&ctx, 1, "Title", "Content").await;

    let response = ctx.send("PUT", "/todo/1", 1, Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(ctx.send("GET", "/todo/1", 1, None).await).await;
    assert_eq!(body["data"]["title"], "Title");
    assert_eq!(body["data"]["content"], "Content");
}

#[tokio::test]
async fn test_body_without_content_type_is_applied() {
    let ctx = TestContext::new();

    let response = ctx
        .send_raw("POST", "/todo", 1, r#"{"title":"Old","content":"Body"}"#)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx.send_raw("PUT", "/todo/1", 1, r#"{"title":"New"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(ctx.send("GET", "/todo/1", 1, None).await).await;
    assert_eq!(body["data"]["title"], "New");
    assert_eq!(body["data"]["content"], "Body");
}

#[tokio::test]
async fn test_malformed_body_is_rejected_without_writing() {
    let ctx = TestContext::new();
    create(&ctx, 1, "Old", "Body").await;
    let invalidations = ctx.cache.invalidated().await.len();

    for raw in [r#"{"title":123}"#, "{not json", r#"["New"]"#] {
        let response = ctx.send_raw("PUT", "/todo/1", 1, raw).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "PUT {}", raw);
        assert_eq!(json_body(response).await["error"], "bad_request");
    }

    let response = ctx.send_raw("POST", "/todo", 1, r#"{"title":1,"content":"x"}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(ctx.send("GET", "/todo/1", 1, None).await).await;
    assert_eq!(body["data"]["title"], "Old");
    assert_eq!(ctx.repo.row_count().await, 1);
    assert_eq!(ctx.cache.invalidated().await.len(), invalidations);
}

#[tokio::test]
async fn test_other_users_notes_are_invisible() {
    let ctx = TestContext::new();
    create(&ctx, 1, "Private", "mine").await;

    let body = json_body(ctx.send("GET", "/todo", 2, None).await).await;
    assert_eq!(body, json!({ "msg": "success", "data": [] }));

    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({ "title": "Hijacked" }))),
        ("DELETE", None),
    ] {
        let response = ctx.send(method, "/todo/1", 2, body).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} /todo/1", method);
    }

    let body = json_body(ctx.send("GET", "/todo/1", 1, None).await).await;
    assert_eq!(body["data"]["title"], "Private");
}

#[tokio::test]
async fn test_create_requires_title_and_content() {
    let ctx = TestContext::new();

    let response = ctx
        .send("POST", "/todo", 1, Some(json!({ "content": "no title" })))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "title is required");

    let response = ctx
        .send("POST", "/todo", 1, Some(json!({ "title": "", "content": "x" })))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx.send("POST", "/todo", 1, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(ctx.repo.row_count().await, 0);
    assert!(ctx.cache.invalidated().await.is_empty());
}

#[tokio::test]
async fn test_missing_or_bad_key_is_not_found() {
    let ctx = TestContext::new();
    create(&ctx, 1, "Title", "Content").await;

    for (method, uri) in [
        ("PUT", "/todo"),
        ("DELETE", "/todo"),
        ("GET", "/todo/abc"),
        ("DELETE", "/todo/abc"),
    ] {
        let response = ctx.send(method, uri, 1, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(json_body(response).await["message"], "key is required");
    }

    let response = ctx.send("GET", "/todo/99", 1, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Todo is not found.");
}

#[tokio::test]
async fn test_mutations_invalidate_callers_cache() {
    let ctx = TestContext::new();
    create(&ctx, 7, "Title", "Content").await;
    ctx.send("GET", "/todo", 7, None).await;
    ctx.send("GET", "/todo/1", 7, None).await;
    ctx.send("PUT", "/todo/1", 7, Some(json!({ "content": "New" }))).await;
    ctx.send("DELETE", "/todo/1", 7, None).await;

    let expected = list_view_cache_key(7);
    assert_eq!(ctx.cache.invalidated().await, vec![expected.clone(), expected.clone(), expected]);
}

#[tokio::test]
async fn test_cache_failure_does_not_fail_request() {
    let ctx = TestContext::new();
    ctx.cache.set_fail(true);

    create(&ctx, 1, "Title", "Content").await;

    assert_eq!(ctx.repo.row_count().await, 1);
    assert_eq!(ctx.cache.invalidated().await.len(), 1);
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let ctx = TestContext::new();
    ctx.repo.set_fail_writes(true);

    let response = ctx
        .send("POST", "/todo", 1, Some(json!({ "title": "T", "content": "C" })))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "internal_error", "message": "An internal error occurred" })
    );
    assert!(ctx.cache.invalidated().await.is_empty());
}

#[tokio::test]
async fn test_versioned_prefix_serves_same_routes() {
    let ctx = TestContext::new();
    create(&ctx, 1, "Title", "Content").await;

    let response = ctx.send("GET", "/api/v1/todo/1", 1, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["key"], "1");
}

#[tokio::test]
async fn test_requests_without_valid_token_are_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .call(Request::builder().uri("/todo").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "unauthorized");

    let response = ctx
        .call(
            Request::builder()
                .uri("/todo")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let foreign = todolist_shared::auth::jwt::create_token(
        &todolist_shared::auth::jwt::Claims::new(1),
        "some-other-secret-that-is-32-bytes-long",
    )
    .unwrap();
    let response = ctx
        .call(
            Request::builder()
                .uri("/todo")
                .header(header::AUTHORIZATION, format!("Bearer {}", foreign))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new();

    let response = ctx
        .call(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("X-Frame-Options").unwrap(), "DENY");

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["cache"], "connected");
}

#[tokio::test]
async fn test_health_reports_cache_outage() {
    let ctx = TestContext::new();
    ctx.cache.set_fail(true);

    let response = ctx
        .call(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["cache"], "disconnected");
}
