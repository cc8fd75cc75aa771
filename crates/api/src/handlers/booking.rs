use axum::{
    extract::State,
    Json,
};
use std::sync::Arc;
use slotbook_core::{
    guard,
    models::{
        availability::SuccessResponse,
        booking::{Booking, BookingWithDetails, CreateBookingRequest},
    },
};

use crate::{
    ApiState,
    middleware::{
        auth::AuthUser,
        error_handling::{AppError, AppJson, AppPath},
    },
};

/// Confirmed bookings made with the caller as expert.
#[axum::debug_handler]
pub async fn get_expert_bookings(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<BookingWithDetails>>, AppError> {
    let bookings = state.store.expert_bookings(user.id).await?;
    Ok(Json(bookings))
}

/// Confirmed bookings the caller made.
#[axum::debug_handler]
pub async fn get_user_bookings(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<BookingWithDetails>>, AppError> {
    let bookings = state.store.user_bookings(user.id).await?;
    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<CreateBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = guard::attempt_booking(state.store.as_ref(), user.id, &payload).await?;
    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    guard::cancel_booking(state.store.as_ref(), id, user.id).await?;
    Ok(Json(SuccessResponse::ok()))
}
