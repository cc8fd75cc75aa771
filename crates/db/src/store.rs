//! PostgreSQL-backed implementation of the core storage traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use slotbook_core::{
    errors::{BookingError, BookingResult},
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

use crate::{DbPool, repositories};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(report: &eyre::Report) -> bool {
    report
        .downcast_ref::<sqlx::Error>()
        .and_then(|err| err.as_database_error())
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

#[async_trait]
impl UserRepo for PgStore {
    async fn get_user_role(&self, user_id: Uuid) -> BookingResult<Option<UserRole>> {
        repositories::user::get_user_role(&self.pool, user_id)
            .await?
            .map(|role| role.parse())
            .transpose()
    }

    async fn upsert_user(&self, identity: &Identity, role: UserRole) -> BookingResult<User> {
        let row = repositories::user::upsert_user(
            &self.pool,
            identity.id,
            &identity.email,
            identity.name.as_deref().unwrap_or_default(),
            role.as_str(),
        )
        .await?;

        Ok(row.into_user()?)
    }

    async fn ensure_expert_profile(&self, user_id: Uuid) -> BookingResult<()> {
        repositories::user::create_expert_profile_if_missing(&self.pool, user_id).await?;
        Ok(())
    }
}

#[async_trait]
impl ServiceRepo for PgStore {
    async fn list_active_services(&self) -> BookingResult<Vec<ServiceWithExpert>> {
        let rows = repositories::service::list_active_services(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_expert_services(&self, expert_id: Uuid) -> BookingResult<Vec<Service>> {
        let rows = repositories::service::list_expert_services(&self.pool, expert_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_service(&self, service_id: i64) -> BookingResult<Option<Service>> {
        let row = repositories::service::get_service_by_id(&self.pool, service_id).await?;
        Ok(row.map(Into::into))
    }

    async fn create_service(
        &self,
        expert_id: Uuid,
        request: &CreateServiceRequest,
    ) -> BookingResult<Service> {
        let row = repositories::service::create_service(
            &self.pool,
            expert_id,
            &request.name,
            request.price,
            request.duration,
            request.description.as_deref(),
        )
        .await?;

        Ok(row.into())
    }

    async fn update_service(
        &self,
        service_id: i64,
        expert_id: Uuid,
        request: &CreateServiceRequest,
    ) -> BookingResult<Option<Service>> {
        let row = repositories::service::update_service(
            &self.pool,
            service_id,
            expert_id,
            &request.name,
            request.price,
            request.duration,
            request.description.as_deref(),
        )
        .await?;

        Ok(row.map(Into::into))
    }

    async fn deactivate_service(&self, service_id: i64, expert_id: Uuid) -> BookingResult<()> {
        repositories::service::deactivate_service(&self.pool, service_id, expert_id).await?;
        Ok(())
    }
}

#[async_trait]
impl AvailabilityRepo for PgStore {
    async fn list_availability(&self, expert_id: Uuid) -> BookingResult<Vec<Availability>> {
        let rows =
            repositories::availability::get_availability_by_expert(&self.pool, expert_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn windows_for_day(
        &self,
        expert_id: Uuid,
        day_of_week: i16,
    ) -> BookingResult<Vec<AvailabilityWindow>> {
        let rows =
            repositories::availability::get_availability_for_day(&self.pool, expert_id, day_of_week)
                .await?;

        Ok(rows
            .into_iter()
            .map(|row| Availability::from(row).window)
            .collect())
    }

    async fn replace_availability(
        &self,
        expert_id: Uuid,
        windows: &[AvailabilityWindow],
    ) -> BookingResult<()> {
        repositories::availability::replace_availability(&self.pool, expert_id, windows).await?;

        tracing::debug!(
            "Replaced availability for expert {} ({} windows)",
            expert_id,
            windows.len()
        );
        Ok(())
    }
}

#[async_trait]
impl BookingRepo for PgStore {
    async fn confirmed_booking_ids(
        &self,
        expert_id: Uuid,
        date: NaiveDate,
        time: ClockTime,
    ) -> BookingResult<Vec<i64>> {
        let ids = repositories::booking::get_confirmed_booking_ids(
            &self.pool,
            expert_id,
            date,
            time.into(),
        )
        .await?;

        Ok(ids)
    }

    async fn booked_times(
        &self,
        expert_id: Uuid,
        date: NaiveDate,
    ) -> BookingResult<Vec<ClockTime>> {
        let times = repositories::booking::get_booked_times(&self.pool, expert_id, date).await?;
        Ok(times.into_iter().map(ClockTime::from).collect())
    }

    async fn insert_booking(
        &self,
        user_id: Uuid,
        request: &CreateBookingRequest,
    ) -> BookingResult<Booking> {
        let row = repositories::booking::create_booking(
            &self.pool,
            user_id,
            request.expert_id,
            request.service_id,
            request.booking_date,
            request.booking_time.into(),
        )
        .await
        .map_err(|report| {
            if is_unique_violation(&report) {
                tracing::warn!(
                    "Concurrent booking lost the race for expert {} at {} {}",
                    request.expert_id, request.booking_date, request.booking_time
                );
                BookingError::SlotAlreadyBooked
            } else {
                BookingError::Database(report)
            }
        })?;

        Ok(row.into_booking()?)
    }

    async fn cancel_booking(&self, booking_id: i64, user_id: Uuid) -> BookingResult<()> {
        repositories::booking::cancel_booking(&self.pool, booking_id, user_id).await?;
        Ok(())
    }

    async fn expert_bookings(&self, expert_id: Uuid) -> BookingResult<Vec<BookingWithDetails>> {
        let rows = repositories::booking::get_expert_bookings(&self.pool, expert_id).await?;
        let details = rows
            .into_iter()
            .map(|row| row.into_expert_view())
            .collect::<eyre::Result<Vec<_>>>()?;
        Ok(details)
    }

    async fn user_bookings(&self, user_id: Uuid) -> BookingResult<Vec<BookingWithDetails>> {
        let rows = repositories::booking::get_user_bookings(&self.pool, user_id).await?;
        let details = rows
            .into_iter()
            .map(|row| row.into_user_view())
            .collect::<eyre::Result<Vec<_>>>()?;
        Ok(details)
    }
}
