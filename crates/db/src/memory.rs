//! In-process store with the same filter and ordering semantics as the
//! PostgreSQL schema. Used by `STORAGE_BACKEND=memory` and by tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use slotbook_core::{
    errors::{BookingError, BookingResult},
    models::{
        availability::{Availability, AvailabilityWindow},
        booking::{Booking, BookingStatus, BookingWithDetails, CreateBookingRequest},
        clock::ClockTime,
        service::{CreateServiceRequest, Service, ServiceWithExpert},
        user::{ExpertProfile, Identity, User, UserRole},
    },
    repository::{AvailabilityRepo, BookingRepo, ServiceRepo, UserRepo},
};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    expert_profiles: Vec<ExpertProfile>,
    services: Vec<Service>,
    availability: Vec<Availability>,
    bookings: Vec<Booking>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_name(&self, id: Uuid) -> Option<String> {
        self.users.iter().find(|u| u.id == id).map(|u| u.name.clone())
    }

    fn service_name(&self, id: i64) -> Option<String> {
        self.services.iter().find(|s| s.id == id).map(|s| s.name.clone())
    }

    fn slot_taken(&self, expert_id: Uuid, date: NaiveDate, time: ClockTime) -> bool {
        self.bookings.iter().any(|b| {
            b.expert_id == expert_id
                && b.booking_date == date
                && b.booking_time == time
                && b.status == BookingStatus::Confirmed
        })
    }

    fn confirmed_sorted<F>(&self, filter: F) -> Vec<Booking>
    where
        F: Fn(&Booking) -> bool,
    {
        let mut rows: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed && filter(b))
            .cloned()
            .collect();
        rows.sort_by_key(|b| (b.booking_date, b.booking_time));
        rows
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> BookingResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| BookingError::Database(eyre::eyre!("memory store lock poisoned")))
    }

    /// Every booking row, including cancelled ones.
    pub fn all_bookings(&self) -> BookingResult<Vec<Booking>> {
        Ok(self.tables()?.bookings.clone())
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn get_user_role(&self, user_id: Uuid) -> BookingResult<Option<UserRole>> {
        let tables = self.tables()?;
        Ok(tables.users.iter().find(|u| u.id == user_id).map(|u| u.role))
    }

    async fn upsert_user(&self, identity: &Identity, role: UserRole) -> BookingResult<User> {
        let mut tables = self.tables()?;
        let now = Utc::now();
        let name = identity.name.clone().unwrap_or_default();

        if let Some(user) = tables.users.iter_mut().find(|u| u.id == identity.id) {
            user.email = identity.email.clone();
            user.name = name;
            user.role = role;
            user.updated_at = now;
            return Ok(user.clone());
        }

        let user = User {
            id: identity.id,
            email: identity.email.clone(),
            name,
            role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn ensure_expert_profile(&self, user_id: Uuid) -> BookingResult<()> {
        let mut tables = self.tables()?;
        if tables.expert_profiles.iter().any(|p| p.user_id == user_id) {
            return Ok(());
        }

        let id = tables.next_id();
        let now = Utc::now();
        tables.expert_profiles.push(ExpertProfile {
            id,
            user_id,
            bio: None,
            specialization: None,
            created_at: now,
            updated_at: now,
        });
        Ok(())
    }
}

#[async_trait]
impl ServiceRepo for MemoryStore {
    async fn list_active_services(&self) -> BookingResult<Vec<ServiceWithExpert>> {
        let tables = self.tables()?;
        // Newest first; ids break ties between rows created in the same instant
        let mut services: Vec<&Service> = tables.services.iter().filter(|s| s.is_active).collect();
        services.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(services
            .into_iter()
            .map(|s| ServiceWithExpert {
                service: s.clone(),
                expert_name: tables.user_name(s.expert_id),
            })
            .collect())
    }

    async fn list_expert_services(&self, expert_id: Uuid) -> BookingResult<Vec<Service>> {
        let tables = self.tables()?;
        let mut services: Vec<Service> = tables
            .services
            .iter()
            .filter(|s| s.expert_id == expert_id && s.is_active)
            .cloned()
            .collect();
        services.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(services)
    }

    async fn get_service(&self, service_id: i64) -> BookingResult<Option<Service>> {
        let tables = self.tables()?;
        Ok(tables.services.iter().find(|s| s.id == service_id).cloned())
    }

    async fn create_service(
        &self,
        expert_id: Uuid,
        request: &CreateServiceRequest,
    ) -> BookingResult<Service> {
        let mut tables = self.tables()?;
        let now = Utc::now();
        let service = Service {
            id: tables.next_id(),
            expert_id,
            name: request.name.clone(),
            price: request.price,
            duration: request.duration,
            description: request.description.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.services.push(service.clone());
        Ok(service)
    }

    async fn update_service(
        &self,
        service_id: i64,
        expert_id: Uuid,
        request: &CreateServiceRequest,
    ) -> BookingResult<Option<Service>> {
        let mut tables = self.tables()?;
        let Some(service) = tables
            .services
            .iter_mut()
            .find(|s| s.id == service_id && s.expert_id == expert_id)
        else {
            return Ok(None);
        };

        service.name = request.name.clone();
        service.price = request.price;
        service.duration = request.duration;
        service.description = request.description.clone();
        service.updated_at = Utc::now();
        Ok(Some(service.clone()))
    }

    async fn deactivate_service(&self, service_id: i64, expert_id: Uuid) -> BookingResult<()> {
        let mut tables = self.tables()?;
        for service in tables
            .services
            .iter_mut()
            .filter(|s| s.id == service_id && s.expert_id == expert_id)
        {
            service.is_active = false;
            service.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl AvailabilityRepo for MemoryStore {
    async fn list_availability(&self, expert_id: Uuid) -> BookingResult<Vec<Availability>> {
        let tables = self.tables()?;
        let mut rows: Vec<Availability> = tables
            .availability
            .iter()
            .filter(|a| a.expert_id == expert_id)
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.window.day_of_week, a.window.start_time));
        Ok(rows)
    }

    async fn windows_for_day(
        &self,
        expert_id: Uuid,
        day_of_week: i16,
    ) -> BookingResult<Vec<AvailabilityWindow>> {
        let tables = self.tables()?;
        Ok(tables
            .availability
            .iter()
            .filter(|a| a.expert_id == expert_id && a.window.day_of_week == day_of_week)
            .map(|a| a.window.clone())
            .collect())
    }

    async fn replace_availability(
        &self,
        expert_id: Uuid,
        windows: &[AvailabilityWindow],
    ) -> BookingResult<()> {
        let mut tables = self.tables()?;
        tables.availability.retain(|a| a.expert_id != expert_id);

        let now = Utc::now();
        for window in windows {
            let id = tables.next_id();
            tables.availability.push(Availability {
                id,
                expert_id,
                window: window.clone(),
                created_at: now,
                updated_at: now,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BookingRepo for MemoryStore {
    async fn confirmed_booking_ids(
        &self,
        expert_id: Uuid,
        date: NaiveDate,
        time: ClockTime,
    ) -> BookingResult<Vec<i64>> {
        let tables = self.tables()?;
        Ok(tables
            .bookings
            .iter()
            .filter(|b| {
                b.expert_id == expert_id
                    && b.booking_date == date
                    && b.booking_time == time
                    && b.status == BookingStatus::Confirmed
            })
            .map(|b| b.id)
            .collect())
    }

    async fn booked_times(
        &self,
        expert_id: Uuid,
        date: NaiveDate,
    ) -> BookingResult<Vec<ClockTime>> {
        let tables = self.tables()?;
        Ok(tables
            .bookings
            .iter()
            .filter(|b| {
                b.expert_id == expert_id
                    && b.booking_date == date
                    && b.status == BookingStatus::Confirmed
            })
            .map(|b| b.booking_time)
            .collect())
    }

    async fn insert_booking(
        &self,
        user_id: Uuid,
        request: &CreateBookingRequest,
    ) -> BookingResult<Booking> {
        let mut tables = self.tables()?;
        // Same rule as the partial unique index in PostgreSQL
        if tables.slot_taken(request.expert_id, request.booking_date, request.booking_time) {
            return Err(BookingError::SlotAlreadyBooked);
        }

        let now = Utc::now();
        let booking = Booking {
            id: tables.next_id(),
            user_id,
            expert_id: request.expert_id,
            service_id: request.service_id,
            booking_date: request.booking_date,
            booking_time: request.booking_time,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };
        tables.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn cancel_booking(&self, booking_id: i64, user_id: Uuid) -> BookingResult<()> {
        let mut tables = self.tables()?;
        for booking in tables
            .bookings
            .iter_mut()
            .filter(|b| b.id == booking_id && b.user_id == user_id)
        {
            booking.status = BookingStatus::Cancelled;
            booking.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn expert_bookings(&self, expert_id: Uuid) -> BookingResult<Vec<BookingWithDetails>> {
        let tables = self.tables()?;
        Ok(tables
            .confirmed_sorted(|b| b.expert_id == expert_id)
            .into_iter()
            .map(|booking| BookingWithDetails {
                service_name: tables.service_name(booking.service_id),
                user_name: tables.user_name(booking.user_id),
                expert_name: None,
                booking,
            })
            .collect())
    }

    async fn user_bookings(&self, user_id: Uuid) -> BookingResult<Vec<BookingWithDetails>> {
        let tables = self.tables()?;
        Ok(tables
            .confirmed_sorted(|b| b.user_id == user_id)
            .into_iter()
            .map(|booking| BookingWithDetails {
                service_name: tables.service_name(booking.service_id),
                user_name: None,
                expert_name: tables.user_name(booking.expert_id),
                booking,
            })
            .collect())
    }
}
