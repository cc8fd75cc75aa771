use axum::http::{header::AUTHORIZATION, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use slotbook_core::models::service::Service;

use crate::test_utils::{bearer, TestContext, EXPERT_TOKEN, OTHER_TOKEN};

async fn create(ctx: &TestContext, name: &str) -> Service {
    let response = ctx
        .server
        .post("/api/services")
        .add_header(AUTHORIZATION, bearer(EXPERT_TOKEN))
        .json(&json!({ "name": name, "price": 40.0, "duration": 45 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Service>()
}

#[tokio::test]
async fn test_created_service_is_listed_with_expert_name() {
    let ctx = TestContext::new();
    ctx.server
        .put("/api/users/role")
        .add_header(AUTHORIZATION, bearer(EXPERT_TOKEN))
        .json(&json!({ "role": "expert" }))
        .await;

    let service = create(&ctx, "Career coaching").await;
    assert_eq!(service.expert_id, ctx.expert.id);
    assert!(service.is_active);

    let listed = ctx.server.get("/api/services").await.json::<Value>();
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["name"], "Career coaching");
    assert_eq!(listed[0]["expert_name"], json!(ctx.expert.name));
}

#[tokio::test]
async fn test_invalid_service_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/services")
        .add_header(AUTHORIZATION, bearer(EXPERT_TOKEN))
        .json(&json!({ "name": "Free advice", "price": 0.0, "duration": 30 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_by_owner_changes_fields() {
    let ctx = TestContext::new();
    let service = create(&ctx, "Career coaching").await;

    let response = ctx
        .server
        .put(&format!("/api/services/{}", service.id))
        .add_header(AUTHORIZATION, bearer(EXPERT_TOKEN))
        .json(&json!({ "name": "Career coaching+", "price": 60.0, "duration": 90 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let updated = response.json::<Service>();
    assert_eq!(updated.id, service.id);
    assert_eq!(updated.name, "Career coaching+");
    assert_eq!(updated.duration, 90);
}

#[tokio::test]
async fn test_update_of_foreign_service_looks_missing() {
    let ctx = TestContext::new();
    let service = create(&ctx, "Career coaching").await;

    let response = ctx
        .server
        .put(&format!("/api/services/{}", service.id))
        .add_header(AUTHORIZATION, bearer(OTHER_TOKEN))
        .json(&json!({ "name": "Hijacked", "price": 1.0, "duration": 30 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("Service not found or unauthorized")
    );
}

#[tokio::test]
async fn test_deleted_service_leaves_listings() {
    let ctx = TestContext::new();
    let kept = create(&ctx, "Kept").await;
    let removed = create(&ctx, "Removed").await;

    let response = ctx
        .server
        .delete(&format!("/api/services/{}", removed.id))
        .add_header(AUTHORIZATION, bearer(EXPERT_TOKEN))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "success": true }));

    let listed = ctx
        .server
        .get(&format!("/api/experts/{}/services", ctx.expert.id))
        .await
        .json::<Vec<Service>>();
    assert_eq!(listed.iter().map(|s| s.id).collect::<Vec<_>>(), vec![kept.id]);
}

#[tokio::test]
async fn test_delete_by_other_expert_is_ignored() {
    let ctx = TestContext::new();
    let service = create(&ctx, "Career coaching").await;

    ctx.server
        .delete(&format!("/api/services/{}", service.id))
        .add_header(AUTHORIZATION, bearer(OTHER_TOKEN))
        .await;

    let listed = ctx
        .server
        .get(&format!("/api/experts/{}/services", ctx.expert.id))
        .await
        .json::<Vec<Service>>();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_non_numeric_service_id_gets_json_error() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .put("/api/services/latest")
        .add_header(AUTHORIZATION, bearer(EXPERT_TOKEN))
        .json(&json!({ "name": "Renamed", "price": 10.0, "duration": 30 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}
