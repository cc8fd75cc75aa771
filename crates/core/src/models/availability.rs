use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

use super::clock::ClockTime;

/// A weekly interval during which an expert accepts bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: i16,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl AvailabilityWindow {
    pub fn new(day_of_week: i16, start_time: ClockTime, end_time: ClockTime) -> Self {
        Self {
            day_of_week,
            start_time,
            end_time,
        }
    }

    /// Windows never span midnight, so the end must come strictly after the start.
    pub fn validate(&self) -> BookingResult<()> {
        if !(0..=6).contains(&self.day_of_week) {
            return Err(BookingError::Validation(format!(
                "day_of_week must be between 0 and 6, got {}",
                self.day_of_week
            )));
        }
        if self.start_time >= self.end_time {
            return Err(BookingError::Validation(format!(
                "Availability window {}-{} must end after it starts",
                self.start_time, self.end_time
            )));
        }
        Ok(())
    }
}

/// Stored availability row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub id: i64,
    pub expert_id: Uuid,
    #[serde(flatten)]
    pub window: AvailabilityWindow,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAvailabilityRequest {
    pub availability: Vec<AvailabilityWindow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Weekday of `date` using 0 = Sunday .. 6 = Saturday.
pub fn day_of_week(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}
