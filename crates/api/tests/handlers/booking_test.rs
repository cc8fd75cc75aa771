use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use slotbook_core::{
    errors::BookingError,
    models::{
        booking::{Booking, BookingStatus, BookingWithDetails},
        service::Service,
    },
};
use slotbook_db::{mock::repositories::MockStore, MemoryStore};
use uuid::Uuid;

use crate::test_utils::{bearer, TestContext, CLIENT_TOKEN, EXPERT_TOKEN, OTHER_TOKEN};

const SERVICE_ID: i64 = 1;

fn booking_body(expert_id: Uuid, service_id: i64, date: &str, time: &str) -> Value {
    json!({
        "expert_id": expert_id,
        "service_id": service_id,
        "booking_date": date,
        "booking_time": time
    })
}

async fn book(ctx: &TestContext, token: &str, time: &str) -> axum_test::TestResponse {
    ctx.server
        .post("/api/bookings")
        .add_header(AUTHORIZATION, bearer(token))
        .json(&booking_body(ctx.expert.id, SERVICE_ID, "2024-01-01", time))
        .await
}

#[tokio::test]
async fn test_create_booking_confirms_slot() {
    let ctx = TestContext::new();

    let response = book(&ctx, CLIENT_TOKEN, "10:00").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let booking = response.json::<Booking>();
    assert_eq!(booking.user_id, ctx.client.id);
    assert_eq!(booking.expert_id, ctx.expert.id);
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.booking_time.to_string(), "10:00");
}

#[tokio::test]
async fn test_second_booking_for_same_slot_is_refused() {
    let ctx = TestContext::new();
    assert_eq!(book(&ctx, CLIENT_TOKEN, "10:00").await.status_code(), StatusCode::OK);

    let response = book(&ctx, OTHER_TOKEN, "10:00").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Time slot is already booked" })
    );
}

#[tokio::test]
async fn test_adjacent_slot_is_still_bookable() {
    let ctx = TestContext::new();
    assert_eq!(book(&ctx, CLIENT_TOKEN, "10:00").await.status_code(), StatusCode::OK);

    let response = book(&ctx, OTHER_TOKEN, "10:30").await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_cancelled_slot_can_be_booked_again() {
    let ctx = TestContext::new();
    let booking = book(&ctx, CLIENT_TOKEN, "10:00").await.json::<Booking>();

    let response = ctx
        .server
        .delete(&format!("/api/bookings/{}", booking.id))
        .add_header(AUTHORIZATION, bearer(CLIENT_TOKEN))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "success": true }));

    let rebooked = book(&ctx, OTHER_TOKEN, "10:00").await;
    assert_eq!(rebooked.status_code(), StatusCode::OK);
    assert_eq!(rebooked.json::<Booking>().user_id, ctx.other.id);
}

#[tokio::test]
async fn test_cancel_only_touches_own_bookings() {
    let store = Arc::new(MemoryStore::new());
    let ctx = TestContext::with_store(store.clone());
    let booking = book(&ctx, CLIENT_TOKEN, "10:00").await.json::<Booking>();

    // Someone else's booking id is silently ignored
    let response = ctx
        .server
        .delete(&format!("/api/bookings/{}", booking.id))
        .add_header(AUTHORIZATION, bearer(OTHER_TOKEN))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let rows = store.all_bookings().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, BookingStatus::Confirmed);
    assert_eq!(
        book(&ctx, OTHER_TOKEN, "10:00").await.status_code(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_booking_lists_show_counterpart_names() {
    let ctx = TestContext::new();
    for token in [EXPERT_TOKEN, CLIENT_TOKEN] {
        let role = if token == EXPERT_TOKEN { "expert" } else { "user" };
        ctx.server
            .put("/api/users/role")
            .add_header(AUTHORIZATION, bearer(token))
            .json(&json!({ "role": role }))
            .await;
    }
    let service = ctx
        .server
        .post("/api/services")
        .add_header(AUTHORIZATION, bearer(EXPERT_TOKEN))
        .json(&json!({ "name": "Tax review", "price": 80.0, "duration": 60 }))
        .await
        .json::<Service>();

    let late = ctx
        .server
        .post("/api/bookings")
        .add_header(AUTHORIZATION, bearer(CLIENT_TOKEN))
        .json(&booking_body(ctx.expert.id, service.id, "2024-01-02", "09:00"))
        .await
        .json::<Booking>();
    let early = ctx
        .server
        .post("/api/bookings")
        .add_header(AUTHORIZATION, bearer(CLIENT_TOKEN))
        .json(&booking_body(ctx.expert.id, service.id, "2024-01-01", "15:00"))
        .await
        .json::<Booking>();

    let mine = ctx
        .server
        .get("/api/bookings/user")
        .add_header(AUTHORIZATION, bearer(CLIENT_TOKEN))
        .await
        .json::<Vec<BookingWithDetails>>();
    assert_eq!(
        mine.iter().map(|b| b.booking.id).collect::<Vec<_>>(),
        vec![early.id, late.id]
    );
    assert_eq!(mine[0].expert_name, ctx.expert.name);
    assert_eq!(mine[0].service_name.as_deref(), Some("Tax review"));
    assert_eq!(mine[0].user_name, None);

    let theirs = ctx
        .server
        .get("/api/bookings/expert")
        .add_header(AUTHORIZATION, bearer(EXPERT_TOKEN))
        .await
        .json::<Vec<BookingWithDetails>>();
    assert_eq!(theirs.len(), 2);
    assert_eq!(theirs[0].user_name, ctx.client.name);
    assert_eq!(theirs[0].expert_name, None);
}

#[tokio::test]
async fn test_taken_slot_never_reaches_insert() {
    let mut store = MockStore::new();
    store
        .expect_confirmed_booking_ids()
        .times(1)
        .returning(|_, _, _| Ok(vec![7]));
    store.expect_insert_booking().never();

    let ctx = TestContext::with_store(Arc::new(store));
    let response = book(&ctx, CLIENT_TOKEN, "10:00").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let mut store = MockStore::new();
    store
        .expect_confirmed_booking_ids()
        .returning(|_, _, _| Err(BookingError::Database(eyre::eyre!("connection reset"))));
    store.expect_insert_booking().never();

    let ctx = TestContext::with_store(Arc::new(store));
    let response = book(&ctx, CLIENT_TOKEN, "10:00").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_malformed_booking_time_is_rejected() {
    let ctx = TestContext::new();

    let response = book(&ctx, CLIENT_TOKEN, "9:00am").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_numeric_booking_id_gets_json_error() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .delete("/api/bookings/abc")
        .add_header(AUTHORIZATION, bearer(CLIENT_TOKEN))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}
