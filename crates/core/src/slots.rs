//! # Slot Generation
//!
//! Turns an expert's availability windows for one weekday into the list of
//! start times a client may book.
//!
//! Each window is walked independently from its start in fixed
//! [`SLOT_STEP_MINUTES`] increments. A candidate is kept when the whole
//! appointment fits before the window closes and nobody holds a confirmed
//! booking at that time. Output follows window order, ascending inside each
//! window. Overlapping windows are not merged, so a time covered twice is
//! emitted twice.

use std::collections::HashSet;

use crate::{
    errors::{BookingError, BookingResult},
    models::{availability::AvailabilityWindow, clock::ClockTime},
};

/// Distance between consecutive candidate start times.
pub const SLOT_STEP_MINUTES: i64 = 30;

/// Computes the bookable start times inside `windows`.
///
/// # Errors
///
/// * `BookingError::Validation` - `duration_minutes` is zero or negative
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use slotbook_core::models::{availability::AvailabilityWindow, clock::ClockTime};
/// use slotbook_core::slots::compute_available_slots;
///
/// let window = AvailabilityWindow::new(
///     1,
///     "09:00".parse().unwrap(),
///     "10:30".parse().unwrap(),
/// );
/// let slots = compute_available_slots(&[window], 60, &HashSet::new()).unwrap();
/// let rendered: Vec<String> = slots.iter().map(ClockTime::to_string).collect();
/// assert_eq!(rendered, ["09:00", "09:30"]);
/// ```
pub fn compute_available_slots(
    windows: &[AvailabilityWindow],
    duration_minutes: i32,
    booked_times: &HashSet<ClockTime>,
) -> BookingResult<Vec<ClockTime>> {
    if duration_minutes <= 0 {
        return Err(BookingError::Validation(format!(
            "Service duration must be positive, got {} minutes",
            duration_minutes
        )));
    }
    let duration = i64::from(duration_minutes);

    let mut slots = Vec::new();
    for window in windows {
        let end = window.end_time.minutes();
        let mut current = window.start_time.minutes();

        while current < end {
            if current + duration <= end {
                // current < end <= 23:59, always representable
                if let Some(slot) = ClockTime::from_minutes(current) {
                    if !booked_times.contains(&slot) {
                        slots.push(slot);
                    }
                }
            }
            current += SLOT_STEP_MINUTES;
        }
    }

    Ok(slots)
}
