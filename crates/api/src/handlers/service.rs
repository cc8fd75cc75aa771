use axum::{
    extract::State,
    Json,
};
use std::sync::Arc;
use slotbook_core::{
    errors::BookingError,
    models::{
        availability::SuccessResponse,
        service::{CreateServiceRequest, Service, ServiceWithExpert},
    },
};
use tracing::info;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::AuthUser,
        error_handling::{AppError, AppJson, AppPath},
    },
};

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<ServiceWithExpert>>, AppError> {
    let services = state.store.list_active_services().await?;
    Ok(Json(services))
}

#[axum::debug_handler]
pub async fn list_expert_services(
    State(state): State<Arc<ApiState>>,
    AppPath(expert_id): AppPath<Uuid>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = state.store.list_expert_services(expert_id).await?;
    Ok(Json(services))
}

#[axum::debug_handler]
pub async fn create_service(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<CreateServiceRequest>,
) -> Result<Json<Service>, AppError> {
    payload.validate()?;

    let service = state.store.create_service(user.id, &payload).await?;
    info!("Expert {} created service {}", user.id, service.id);
    Ok(Json(service))
}

#[axum::debug_handler]
pub async fn update_service(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<CreateServiceRequest>,
) -> Result<Json<Service>, AppError> {
    payload.validate()?;

    // Ownership is part of the lookup, so foreign services look missing
    let service = state
        .store
        .update_service(id, user.id, &payload)
        .await?
        .ok_or_else(|| BookingError::NotFound("Service not found or unauthorized".to_string()))?;

    Ok(Json(service))
}

/// Soft delete: the service disappears from listings but stays referenced
/// by existing bookings.
#[axum::debug_handler]
pub async fn delete_service(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.store.deactivate_service(id, user.id).await?;
    Ok(Json(SuccessResponse::ok()))
}
