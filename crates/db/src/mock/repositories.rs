use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use slotbook_core::{
    errors::BookingResult,
    models::{
        availability::{Availability, AvailabilityWindow},
        booking::{Booking, BookingWithDetails, CreateBookingRequest},
        clock::ClockTime,
        service::{CreateServiceRequest, Service, ServiceWithExpert},
        user::{Identity, User, UserRole},
    },
    repository::{AvailabilityRepo, BookingRepo, ServiceRepo, UserRepo},
};
use uuid::Uuid;

// Mock store for testing; implements every repository trait and therefore `Store`
mock! {
    pub Store {}

    #[async_trait]
    impl UserRepo for Store {
        async fn get_user_role(&self, user_id: Uuid) -> BookingResult<Option<UserRole>>;

        async fn upsert_user(&self, identity: &Identity, role: UserRole) -> BookingResult<User>;

        async fn ensure_expert_profile(&self, user_id: Uuid) -> BookingResult<()>;
    }

    #[async_trait]
    impl ServiceRepo for Store {
        async fn list_active_services(&self) -> BookingResult<Vec<ServiceWithExpert>>;

        async fn list_expert_services(&self, expert_id: Uuid) -> BookingResult<Vec<Service>>;

        async fn get_service(&self, service_id: i64) -> BookingResult<Option<Service>>;

        async fn create_service(
            &self,
            expert_id: Uuid,
            request: &CreateServiceRequest,
        ) -> BookingResult<Service>;

        async fn update_service(
            &self,
            service_id: i64,
            expert_id: Uuid,
            request: &CreateServiceRequest,
        ) -> BookingResult<Option<Service>>;

        async fn deactivate_service(&self, service_id: i64, expert_id: Uuid) -> BookingResult<()>;
    }

    #[async_trait]
    impl AvailabilityRepo for Store {
        async fn list_availability(&self, expert_id: Uuid) -> BookingResult<Vec<Availability>>;

        async fn windows_for_day(
            &self,
            expert_id: Uuid,
            day_of_week: i16,
        ) -> BookingResult<Vec<AvailabilityWindow>>;

        async fn replace_availability(
            &self,
            expert_id: Uuid,
            windows: &[AvailabilityWindow],
        ) -> BookingResult<()>;
    }

    #[async_trait]
    impl BookingRepo for Store {
        async fn confirmed_booking_ids(
            &self,
            expert_id: Uuid,
            date: NaiveDate,
            time: ClockTime,
        ) -> BookingResult<Vec<i64>>;

        async fn booked_times(
            &self,
            expert_id: Uuid,
            date: NaiveDate,
        ) -> BookingResult<Vec<ClockTime>>;

        async fn insert_booking(
            &self,
            user_id: Uuid,
            request: &CreateBookingRequest,
        ) -> BookingResult<Booking>;

        async fn cancel_booking(&self, booking_id: i64, user_id: Uuid) -> BookingResult<()>;

        async fn expert_bookings(&self, expert_id: Uuid) -> BookingResult<Vec<BookingWithDetails>>;

        async fn user_bookings(&self, user_id: Uuid) -> BookingResult<Vec<BookingWithDetails>>;
    }
}
