//! # Booking Conflict Guard
//!
//! Keeps at most one confirmed booking per (expert, date, time).
//!
//! The guard reads confirmed bookings for the requested slot and refuses with
//! [`BookingError::SlotAlreadyBooked`] before any insert happens. Two callers
//! can still pass the read concurrently; stores close that window with a
//! uniqueness rule on confirmed bookings, reported through the same error.

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::booking::{Booking, CreateBookingRequest},
    repository::BookingRepo,
};

/// Books the requested slot for `user_id` unless it is already taken.
pub async fn attempt_booking<R>(
    repo: &R,
    user_id: Uuid,
    request: &CreateBookingRequest,
) -> BookingResult<Booking>
where
    R: BookingRepo + ?Sized,
{
    let existing = repo
        .confirmed_booking_ids(request.expert_id, request.booking_date, request.booking_time)
        .await?;

    if !existing.is_empty() {
        debug!(
            "Slot {} {} for expert {} already held by booking(s) {:?}",
            request.booking_date, request.booking_time, request.expert_id, existing
        );
        return Err(BookingError::SlotAlreadyBooked);
    }

    let booking = repo.insert_booking(user_id, request).await?;
    info!(
        "Booking {} confirmed: expert={}, date={}, time={}",
        booking.id, booking.expert_id, booking.booking_date, booking.booking_time
    );
    Ok(booking)
}

/// Cancels one of the caller's bookings. The row is kept with status
/// `cancelled`, which frees the slot.
pub async fn cancel_booking<R>(repo: &R, booking_id: i64, user_id: Uuid) -> BookingResult<()>
where
    R: BookingRepo + ?Sized,
{
    repo.cancel_booking(booking_id, user_id).await?;
    info!("Booking {} cancelled by user {}", booking_id, user_id);
    Ok(())
}
