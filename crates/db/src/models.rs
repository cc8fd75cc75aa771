use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::Result;
use serde::{Deserialize, Serialize};
use slotbook_core::models::{
    availability::{Availability, AvailabilityWindow},
    booking::{Booking, BookingWithDetails},
    service::{Service, ServiceWithExpert},
    user::User,
};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: i64,
    pub expert_id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration: i32,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbServiceWithExpert {
    #[sqlx(flatten)]
    pub service: DbService,
    pub expert_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailability {
    pub id: i64,
    pub expert_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: i64,
    pub user_id: Uuid,
    pub expert_id: Uuid,
    pub service_id: i64,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking row joined with service and counterpart names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBookingDetails {
    #[sqlx(flatten)]
    pub booking: DbBooking,
    pub service_name: Option<String>,
    pub counterpart_name: Option<String>,
}

impl DbUser {
    pub fn into_user(self) -> Result<User> {
        Ok(User {
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role.parse()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Service {
            id: row.id,
            expert_id: row.expert_id,
            name: row.name,
            price: row.price,
            duration: row.duration,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbServiceWithExpert> for ServiceWithExpert {
    fn from(row: DbServiceWithExpert) -> Self {
        ServiceWithExpert {
            service: row.service.into(),
            expert_name: row.expert_name,
        }
    }
}

impl From<DbAvailability> for Availability {
    fn from(row: DbAvailability) -> Self {
        Availability {
            id: row.id,
            expert_id: row.expert_id,
            window: AvailabilityWindow::new(
                row.day_of_week,
                row.start_time.into(),
                row.end_time.into(),
            ),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl DbBooking {
    pub fn into_booking(self) -> Result<Booking> {
        Ok(Booking {
            id: self.id,
            user_id: self.user_id,
            expert_id: self.expert_id,
            service_id: self.service_id,
            booking_date: self.booking_date,
            booking_time: self.booking_time.into(),
            status: self.status.parse()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl DbBookingDetails {
    /// Expert view: the counterpart is the client who booked.
    pub fn into_expert_view(self) -> Result<BookingWithDetails> {
        Ok(BookingWithDetails {
            booking: self.booking.into_booking()?,
            service_name: self.service_name,
            user_name: self.counterpart_name,
            expert_name: None,
        })
    }

    /// Client view: the counterpart is the expert.
    pub fn into_user_view(self) -> Result<BookingWithDetails> {
        Ok(BookingWithDetails {
            booking: self.booking.into_booking()?,
            service_name: self.service_name,
            user_name: None,
            expert_name: self.counterpart_name,
        })
    }
}
