//! # Availability Handlers
//!
//! Experts publish weekly availability windows; clients ask which start
//! times are still open on a given date.
//!
//! ## Free Slot Lookup
//!
//! `GET /api/availability/:expert_id/:service_id/:date` works in three reads
//! followed by a pure computation:
//!
//! 1. The expert's windows for the weekday of `date` (0 = Sunday)
//! 2. The duration of the requested service
//! 3. The start times of confirmed bookings for that expert and date
//!
//! The windows, duration and booked times are then handed to
//! [`compute_available_slots`]. A weekday without windows, or an unknown
//! service, yields an empty list rather than an error.

use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::State,
    Json,
};
use chrono::NaiveDate;
use slotbook_core::{
    errors::BookingError,
    models::{
        availability::{Availability, SetAvailabilityRequest, SuccessResponse, day_of_week},
        clock::ClockTime,
    },
    slots::compute_available_slots,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::AuthUser,
        error_handling::{AppError, AppJson, AppPath},
    },
};

/// Lists an expert's windows ordered by weekday, then start time.
#[axum::debug_handler]
pub async fn get_expert_availability(
    State(state): State<Arc<ApiState>>,
    AppPath(expert_id): AppPath<Uuid>,
) -> Result<Json<Vec<Availability>>, AppError> {
    let availability = state.store.list_availability(expert_id).await?;
    Ok(Json(availability))
}

/// Replaces all of the caller's windows.
///
/// Every window is validated before anything is written, so a single bad
/// window leaves the stored availability untouched.
///
/// # Errors
///
/// * `BookingError::Validation` - a window ends before it starts or names a day outside 0..=6
/// * `BookingError::Authentication` - missing or rejected bearer token
#[axum::debug_handler]
pub async fn set_availability(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<SetAvailabilityRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    for window in &payload.availability {
        window.validate()?;
    }

    state
        .store
        .replace_availability(user.id, &payload.availability)
        .await?;

    debug!(
        "Expert {} saved {} availability windows",
        user.id,
        payload.availability.len()
    );
    Ok(Json(SuccessResponse::ok()))
}

/// Computes the open start times for one expert, service and date.
///
/// # Errors
///
/// * `BookingError::Validation` - `date` is not `YYYY-MM-DD`
/// * `BookingError::Database` - a storage read failed
#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<ApiState>>,
    AppPath((expert_id, service_id, date)): AppPath<(Uuid, i64, String)>,
) -> Result<Json<Vec<ClockTime>>, AppError> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
        BookingError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", date))
    })?;

    let windows = state
        .store
        .windows_for_day(expert_id, day_of_week(date))
        .await?;
    if windows.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let Some(service) = state.store.get_service(service_id).await? else {
        debug!("Service {} not found, no slots offered", service_id);
        return Ok(Json(Vec::new()));
    };

    let booked: HashSet<ClockTime> = state
        .store
        .booked_times(expert_id, date)
        .await?
        .into_iter()
        .collect();

    let slots = compute_available_slots(&windows, service.duration, &booked)?;
    Ok(Json(slots))
}
