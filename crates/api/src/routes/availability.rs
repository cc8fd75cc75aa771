use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/availability",
            post(handlers::availability::set_availability),
        )
        .route(
            "/api/availability/:expert_id",
            get(handlers::availability::get_expert_availability),
        )
        .route(
            "/api/availability/:expert_id/:service_id/:date",
            get(handlers::availability::get_available_slots),
        )
}
