//! HTTP tests for `/blogs`, `/history` and `/health`
//!
//! Requests go through the full router (JWT middleware, extractors, error
//! mapping) against in-memory stores.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use crate::common::{admin, alice, bob, create_approved, create_pending, TestHarness};
use moderation_core::kernel::TestDependencies;
use moderation_core::server::build_app;
use test_context::test_context;

// ============================================================================
// POST /blogs
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn create_requires_authentication(ctx: &TestHarness) {
    let response = ctx
        .client()
        .post("/blogs", None, json!({"title": "Hello", "content": "Body"}))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), Some("Unauthorized"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_rejects_invalid_token(ctx: &TestHarness) {
    let response = ctx
        .client()
        .post(
            "/blogs",
            Some("not-a-jwt"),
            json!({"title": "Hello", "content": "Body"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_returns_pending_blog_ignoring_status(ctx: &TestHarness) {
    let token = ctx.token(&alice());
    let response = ctx
        .client()
        .post(
            "/blogs",
            Some(&token),
            json!({
                "title": "Hello World",
                "content": "Body text",
                "status": "APPROVED",
                "image_url": "/img/hello.png"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let blog = &response.body["blog"];
    assert_eq!(blog["status"], "PENDING");
    assert_eq!(blog["slug"], "hello-world");
    assert_eq!(blog["excerpt"], "Hello World");
    assert_eq!(blog["imageUrl"], "/img/hello.png");
    assert!(blog["publishedAt"].is_null());
    assert!(blog["rejectionReason"].is_null());
    assert_eq!(blog["authorId"], "auth0|alice");
    assert_eq!(blog["author"]["name"], "Alice");
    assert_eq!(blog["author"]["email"], "alice@example.com");
    assert!(blog["createdAt"].is_string());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_with_missing_fields_is_bad_request(ctx: &TestHarness) {
    let token = ctx.token(&alice());
    let response = ctx
        .client()
        .post("/blogs", Some(&token), json!({"title": "Only a title"}))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), Some("Title and content are required"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn malformed_json_is_invalid_request_data(ctx: &TestHarness) {
    let token = ctx.token(&alice());
    let response = ctx
        .client()
        .send(
            Method::POST,
            "/blogs",
            Some(&token),
            Some("{not json".to_string()),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), Some("Invalid request data"));
    assert!(response.body["details"].is_string());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn store_failure_is_internal_server_error(ctx: &TestHarness) {
    ctx.blogs.set_failing(true);
    let token = ctx.token(&alice());

    let response = ctx
        .client()
        .post(
            "/blogs",
            Some(&token),
            json!({"title": "Hello", "content": "Body"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), Some("Internal Server Error"));
    assert!(response.body["details"].is_string());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn history_outage_does_not_fail_create(ctx: &TestHarness) {
    ctx.history.set_failing(true);
    let token = ctx.token(&alice());

    let response = ctx
        .client()
        .post(
            "/blogs",
            Some(&token),
            json!({"title": "Hello", "content": "Body"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(ctx.deps.history.failures(), 1);
}

// ============================================================================
// GET /blogs
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn list_returns_visible_blogs(ctx: &TestHarness) {
    create_pending(&ctx.deps, &alice(), "Alice pending").await;
    create_approved(&ctx.deps, &alice(), "Alice approved").await;
    create_pending(&ctx.deps, &bob(), "Bob pending").await;

    let token = ctx.token(&bob());
    let response = ctx.client().get("/blogs", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let blogs = response.body["blogs"].as_array().unwrap();
    let mut titles: Vec<&str> = blogs.iter().map(|b| b["title"].as_str().unwrap()).collect();
    titles.sort();
    assert_eq!(titles, vec!["Alice approved", "Bob pending"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn list_with_unknown_status_is_bad_request(ctx: &TestHarness) {
    let token = ctx.token(&bob());
    let response = ctx.client().get("/blogs?status=DRAFT", Some(&token)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn list_with_malformed_query_is_invalid_request_data(ctx: &TestHarness) {
    let token = ctx.token(&bob());
    let response = ctx
        .client()
        .get("/blogs?status=PENDING&status=APPROVED", Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), Some("Invalid request data"));
    assert!(response.body["details"]
        .as_str()
        .unwrap()
        .contains("duplicate field"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn list_requires_authentication(ctx: &TestHarness) {
    let response = ctx.client().get("/blogs", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// GET /blogs/{id}
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn get_approved_blog_is_public(ctx: &TestHarness) {
    let id = create_approved(&ctx.deps, &alice(), "Public").await;

    let response = ctx.client().get(&format!("/blogs/{}", id), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], "Public");
    assert!(response.body["publishedAt"].is_string());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn get_pending_blog_status_codes(ctx: &TestHarness) {
    let id = create_pending(&ctx.deps, &alice(), "Draft").await;
    let uri = format!("/blogs/{}", id);

    let anonymous = ctx.client().get(&uri, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let bob_token = ctx.token(&bob());
    let other = ctx.client().get(&uri, Some(&bob_token)).await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);

    let alice_token = ctx.token(&alice());
    let owner = ctx.client().get(&uri, Some(&alice_token)).await;
    assert_eq!(owner.status, StatusCode::OK);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn get_unknown_or_malformed_id_is_not_found(ctx: &TestHarness) {
    let response = ctx.client().get("/blogs/not-a-uuid", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = ctx
        .client()
        .get("/blogs/00000000-0000-0000-0000-000000000000", None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), Some("Blog not found"));
}

// ============================================================================
// PATCH /blogs/{id}
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn patch_moderation_scenario(ctx: &TestHarness) {
    let alice_token = ctx.token(&alice());
    let admin_token = ctx.token(&admin());

    let created = ctx
        .client()
        .post(
            "/blogs",
            Some(&alice_token),
            json!({"title": "Hello World", "content": "Body text"}),
        )
        .await;
    let id = created.body["blog"]["id"].as_str().unwrap().to_string();
    let uri = format!("/blogs/{}", id);

    let approved = ctx
        .client()
        .patch(&uri, Some(&admin_token), json!({"status": "APPROVED"}))
        .await;
    assert_eq!(approved.status, StatusCode::OK);
    assert_eq!(approved.body["blog"]["status"], "APPROVED");
    let published_at = approved.body["blog"]["publishedAt"].clone();
    assert!(published_at.is_string());

    let rejected = ctx
        .client()
        .patch(
            &uri,
            Some(&admin_token),
            json!({"status": "REJECTED", "rejectionReason": ""}),
        )
        .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);

    let current = ctx.client().get(&uri, None).await;
    assert_eq!(current.body["status"], "APPROVED");
    assert_eq!(current.body["publishedAt"], published_at);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn patch_rejected_to_approved_is_bad_request(ctx: &TestHarness) {
    let id = create_pending(&ctx.deps, &alice(), "Hello").await;
    let admin_token = ctx.token(&admin());
    let uri = format!("/blogs/{}", id);

    let rejected = ctx
        .client()
        .patch(
            &uri,
            Some(&admin_token),
            json!({"status": "REJECTED", "rejectionReason": "Off topic"}),
        )
        .await;
    assert_eq!(rejected.status, StatusCode::OK);
    assert_eq!(rejected.body["blog"]["rejectionReason"], "Off topic");

    let response = ctx
        .client()
        .patch(&uri, Some(&admin_token), json!({"status": "APPROVED"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.error(),
        Some("Cannot change status from REJECTED to APPROVED")
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn patch_by_non_admin_is_forbidden(ctx: &TestHarness) {
    let id = create_pending(&ctx.deps, &alice(), "Hello").await;
    let token = ctx.token(&alice());

    let response = ctx
        .client()
        .patch(
            &format!("/blogs/{}", id),
            Some(&token),
            json!({"status": "APPROVED"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_patches_both_succeed(ctx: &TestHarness) {
    let id = create_pending(&ctx.deps, &alice(), "Hello").await;
    let token = ctx.token(&admin());
    let uri = format!("/blogs/{}", id);
    let client = ctx.client();

    let (first, second) = tokio::join!(
        client.patch(&uri, Some(&token), json!({"status": "APPROVED"})),
        client.patch(&uri, Some(&token), json!({"status": "APPROVED"})),
    );

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(first.body["blog"]["status"], "APPROVED");
    assert_eq!(second.body["blog"]["status"], "APPROVED");
    assert_eq!(ctx.history.write_count(), 2);
}

// ============================================================================
// PUT / DELETE /blogs/{id}
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn put_updates_content(ctx: &TestHarness) {
    let id = create_pending(&ctx.deps, &alice(), "Original").await;
    let token = ctx.token(&alice());

    let response = ctx
        .client()
        .put(
            &format!("/blogs/{}", id),
            Some(&token),
            json!({"title": "Edited", "imageUrl": "/new.png", "category": "news"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], "Edited");
    assert_eq!(response.body["imageUrl"], "/new.png");
    assert_eq!(response.body["category"], "news");
    assert_eq!(response.body["status"], "PENDING");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn delete_returns_message(ctx: &TestHarness) {
    let id = create_pending(&ctx.deps, &alice(), "Doomed").await;
    let uri = format!("/blogs/{}", id);

    let bob_token = ctx.token(&bob());
    let forbidden = ctx.client().delete(&uri, Some(&bob_token)).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let token = ctx.token(&alice());
    let response = ctx.client().delete(&uri, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Blog deleted successfully");

    let again = ctx.client().delete(&uri, Some(&token)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// /history and /health
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn history_lists_latest_snapshots(ctx: &TestHarness) {
    let id = create_approved(&ctx.deps, &alice(), "Hello").await;
    let token = ctx.token(&admin());

    let response = ctx.client().get("/history", Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let events = response.body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["historyId"], id.to_string());
    assert_eq!(events[0]["application"], "history");
    assert_eq!(events[0]["status"], "APPROVED");
    assert_eq!(events[0]["userEmail"], "admin@example.com");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn health_reports_history_failures(ctx: &TestHarness) {
    ctx.history.set_failing(true);
    create_pending(&ctx.deps, &alice(), "Hello").await;

    let response = ctx.client().get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "degraded");
    assert_eq!(response.body["database"]["status"], "ok");
    assert_eq!(response.body["history"]["status"], "error");
    assert_eq!(response.body["historyFailures"], 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn health_is_unavailable_without_blog_store(ctx: &TestHarness) {
    ctx.blogs.set_failing(true);

    let response = ctx.client().get("/health", None).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["status"], "unhealthy");
}

// ============================================================================
// Rate limiting
// ============================================================================

async fn health_from(app: &Router, client_ip: &str) -> StatusCode {
    let request = Request::builder()
        .uri("/health")
        .header("x-forwarded-for", client_ip)
        .body(Body::empty())
        .unwrap();

    app.clone().oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn rate_limit_keys_on_forwarded_client_ip() {
    let app = build_app(TestDependencies::new().into_deps(), true).unwrap();

    for _ in 0..20 {
        assert_eq!(health_from(&app, "203.0.113.7").await, StatusCode::OK);
    }
    assert_eq!(
        health_from(&app, "203.0.113.7").await,
        StatusCode::TOO_MANY_REQUESTS
    );

    // Another client behind the same proxy has its own quota
    assert_eq!(health_from(&app, "203.0.113.8").await, StatusCode::OK);
}
