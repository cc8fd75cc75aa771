use axum::{
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use slotbook_api::middleware::{
    auth::{AuthProvider, SupabaseAuth},
    error_handling::map_error,
};
use slotbook_core::errors::BookingError;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::test_utils::{bearer, TestContext, CLIENT_TOKEN};

#[rstest]
#[case::not_found(BookingError::NotFound("Service 4".into()), StatusCode::NOT_FOUND)]
#[case::validation(BookingError::Validation("bad input".into()), StatusCode::BAD_REQUEST)]
#[case::slot_taken(BookingError::SlotAlreadyBooked, StatusCode::BAD_REQUEST)]
#[case::authentication(
    BookingError::Authentication("Missing token".into()),
    StatusCode::UNAUTHORIZED
)]
#[case::authorization(BookingError::Authorization("Not yours".into()), StatusCode::FORBIDDEN)]
#[case::database(
    BookingError::Database(eyre::eyre!("Database error")),
    StatusCode::INTERNAL_SERVER_ERROR
)]
#[case::internal(
    BookingError::Internal(Box::new(std::io::Error::other("Internal error"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/bookings/user").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().contains("Missing token"));
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/bookings/user")
        .add_header(AUTHORIZATION, bearer("forged"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().contains("Invalid session"));
}

#[tokio::test]
async fn test_raw_token_without_bearer_prefix_is_accepted() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/bookings/user")
        .add_header(AUTHORIZATION, HeaderValue::from_static(CLIENT_TOKEN))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_health_and_session_endpoints() {
    let ctx = TestContext::new();

    let health = ctx.server.get("/health").await;
    assert_eq!(health.json::<Value>(), json!({ "status": "ok" }));

    let session = ctx.server.post("/api/sessions").await;
    assert_eq!(session.status_code(), StatusCode::OK);
    assert_eq!(session.json::<Value>()["success"], json!(true));
}

/// Serves a minimal `/auth/v1/user` that accepts only `good-token`.
async fn spawn_auth_provider(user_id: Uuid) -> String {
    let app = Router::new().route(
        "/auth/v1/user",
        get(move |headers: HeaderMap| async move {
            let authorized = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
                == Some("Bearer good-token");
            let keyed = headers.get("apikey").and_then(|v| v.to_str().ok()) == Some("anon-key");

            if authorized && keyed {
                Ok(Json(json!({
                    "id": user_id,
                    "email": "ada@example.com",
                    "user_metadata": { "name": "Ada Lovelace" }
                })))
            } else {
                Err(StatusCode::UNAUTHORIZED)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[test_log::test(tokio::test)]
async fn test_supabase_auth_resolves_identity() {
    let user_id = Uuid::new_v4();
    let base_url = spawn_auth_provider(user_id).await;
    let auth = SupabaseAuth::new(base_url, "anon-key");

    let identity = auth.verify("good-token").await.unwrap();

    assert_eq!(identity.id, user_id);
    assert_eq!(identity.email, "ada@example.com");
    assert_eq!(identity.name.as_deref(), Some("Ada Lovelace"));
}

#[test_log::test(tokio::test)]
async fn test_supabase_auth_rejects_bad_token() {
    let base_url = spawn_auth_provider(Uuid::new_v4()).await;
    let auth = SupabaseAuth::new(base_url, "anon-key");

    let result = auth.verify("stale-token").await;

    assert!(matches!(result, Err(BookingError::Authentication(_))));
}

#[tokio::test]
async fn test_supabase_auth_unreachable_provider_is_invalid_session() {
    // Nothing listens on port 9 locally
    let auth = SupabaseAuth::new("http://127.0.0.1:9", "anon-key");

    let result = auth.verify("good-token").await;

    match result {
        Err(BookingError::Authentication(message)) => assert_eq!(message, "Invalid session"),
        other => panic!("Expected Authentication error, got: {:?}", other),
    }
}
