use axum::{extract::State, Json};
use std::sync::Arc;
use slotbook_core::{
    errors::BookingError,
    models::user::{UserRole, UserRoleRequest, UserRoleResponse},
};
use tracing::info;

use crate::{
    ApiState,
    middleware::{
        auth::AuthUser,
        error_handling::{AppError, AppJson},
    },
};

#[axum::debug_handler]
pub async fn get_user_role(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserRoleResponse>, AppError> {
    let role = state
        .store
        .get_user_role(user.id)
        .await?
        .ok_or_else(|| BookingError::NotFound("User profile not found in database".to_string()))?;

    Ok(Json(UserRoleResponse { role }))
}

/// Stores the caller's profile with the chosen role. Becoming an expert
/// also creates an expert profile the first time.
#[axum::debug_handler]
pub async fn set_user_role(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<UserRoleRequest>,
) -> Result<Json<UserRoleResponse>, AppError> {
    state.store.upsert_user(&user, payload.role).await?;

    if payload.role == UserRole::Expert {
        state.store.ensure_expert_profile(user.id).await?;
    }

    info!("User {} now has role {}", user.id, payload.role);
    Ok(Json(UserRoleResponse { role: payload.role }))
}
