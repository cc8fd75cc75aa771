//! Storage seams consumed by the booking core and the HTTP layer.
//!
//! Implementations only need equality filters and ordered reads; the
//! PostgreSQL and in-memory stores live in `slotbook-db`.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::BookingResult,
    models::{
        availability::{Availability, AvailabilityWindow},
        booking::{Booking, BookingWithDetails, CreateBookingRequest},
        clock::ClockTime,
        service::{CreateServiceRequest, Service, ServiceWithExpert},
        user::{Identity, User, UserRole},
    },
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get_user_role(&self, user_id: Uuid) -> BookingResult<Option<UserRole>>;

    /// Inserts or replaces the user row keyed by `identity.id`.
    async fn upsert_user(&self, identity: &Identity, role: UserRole) -> BookingResult<User>;

    /// Creates an empty expert profile unless one already exists.
    async fn ensure_expert_profile(&self, user_id: Uuid) -> BookingResult<()>;
}

#[async_trait]
pub trait ServiceRepo: Send + Sync {
    /// Active services, newest first, with the owning expert's name.
    async fn list_active_services(&self) -> BookingResult<Vec<ServiceWithExpert>>;

    async fn list_expert_services(&self, expert_id: Uuid) -> BookingResult<Vec<Service>>;

    async fn get_service(&self, service_id: i64) -> BookingResult<Option<Service>>;

    async fn create_service(
        &self,
        expert_id: Uuid,
        request: &CreateServiceRequest,
    ) -> BookingResult<Service>;

    /// Returns `None` when no service with `service_id` belongs to `expert_id`.
    async fn update_service(
        &self,
        service_id: i64,
        expert_id: Uuid,
        request: &CreateServiceRequest,
    ) -> BookingResult<Option<Service>>;

    async fn deactivate_service(&self, service_id: i64, expert_id: Uuid) -> BookingResult<()>;
}

#[async_trait]
pub trait AvailabilityRepo: Send + Sync {
    /// All windows of an expert ordered by day, then start time.
    async fn list_availability(&self, expert_id: Uuid) -> BookingResult<Vec<Availability>>;

    async fn windows_for_day(
        &self,
        expert_id: Uuid,
        day_of_week: i16,
    ) -> BookingResult<Vec<AvailabilityWindow>>;

    /// Deletes every window of the expert, then inserts `windows`.
    async fn replace_availability(
        &self,
        expert_id: Uuid,
        windows: &[AvailabilityWindow],
    ) -> BookingResult<()>;
}

#[async_trait]
pub trait BookingRepo: Send + Sync {
    /// Ids of confirmed bookings occupying the exact slot.
    async fn confirmed_booking_ids(
        &self,
        expert_id: Uuid,
        date: NaiveDate,
        time: ClockTime,
    ) -> BookingResult<Vec<i64>>;

    /// Start times of confirmed bookings for an expert on a date.
    async fn booked_times(&self, expert_id: Uuid, date: NaiveDate) -> BookingResult<Vec<ClockTime>>;

    /// Inserts a confirmed booking. Fails with `SlotAlreadyBooked` if the
    /// store already holds a confirmed booking for the same slot.
    async fn insert_booking(
        &self,
        user_id: Uuid,
        request: &CreateBookingRequest,
    ) -> BookingResult<Booking>;

    /// Marks the caller's booking cancelled. Bookings owned by other users
    /// are left untouched.
    async fn cancel_booking(&self, booking_id: i64, user_id: Uuid) -> BookingResult<()>;

    async fn expert_bookings(&self, expert_id: Uuid) -> BookingResult<Vec<BookingWithDetails>>;

    async fn user_bookings(&self, user_id: Uuid) -> BookingResult<Vec<BookingWithDetails>>;
}

/// Everything the HTTP layer needs from storage.
pub trait Store: UserRepo + ServiceRepo + AvailabilityRepo + BookingRepo {}

impl<T> Store for T where T: UserRepo + ServiceRepo + AvailabilityRepo + BookingRepo {}
