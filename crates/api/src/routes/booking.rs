use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/bookings", post(handlers::booking::create_booking))
        .route("/api/bookings/:id", delete(handlers::booking::cancel_booking))
        .route(
            "/api/bookings/expert",
            get(handlers::booking::get_expert_bookings),
        )
        .route("/api/bookings/user", get(handlers::booking::get_user_bookings))
}
