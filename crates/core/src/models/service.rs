use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub expert_id: Uuid,
    pub name: String,
    pub price: f64,
    /// Minutes.
    pub duration: i32,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceWithExpert {
    #[serde(flatten)]
    pub service: Service,
    pub expert_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub price: f64,
    pub duration: i32,
    pub description: Option<String>,
}

impl CreateServiceRequest {
    pub fn validate(&self) -> BookingResult<()> {
        if self.name.trim().is_empty() {
            return Err(BookingError::Validation("Service name must not be empty".to_string()));
        }
        if !(self.price > 0.0) {
            return Err(BookingError::Validation("Service price must be positive".to_string()));
        }
        if self.duration <= 0 {
            return Err(BookingError::Validation(
                "Service duration must be a positive number of minutes".to_string(),
            ));
        }
        Ok(())
    }
}
