use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/services",
            get(handlers::service::list_services).post(handlers::service::create_service),
        )
        .route(
            "/api/services/:id",
            put(handlers::service::update_service).delete(handlers::service::delete_service),
        )
        .route(
            "/api/experts/:expert_id/services",
            get(handlers::service::list_expert_services),
        )
}
