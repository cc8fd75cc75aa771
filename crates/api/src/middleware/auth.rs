//! # Authentication Module
//!
//! Bearer tokens are issued and checked by an external auth provider. This
//! module defines the [`AuthProvider`] seam, a Supabase implementation of it,
//! and the [`AuthUser`] extractor that resolves the caller's identity for a
//! single request.
//!
//! The identity travels with the request as an extractor value; nothing is
//! stored globally between requests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Deserialize;
use slotbook_core::{
    errors::{BookingError, BookingResult},
    models::user::Identity,
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Verifies bearer tokens against an identity service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns the identity behind `token`.
    ///
    /// # Errors
    ///
    /// * `BookingError::Authentication` - the token was rejected or could not be checked
    async fn verify(&self, token: &str) -> BookingResult<Identity>;
}

/// Token verification through Supabase Auth's `GET /auth/v1/user`.
pub struct SupabaseAuth {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: serde_json::Value,
}

impl SupabaseAuth {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn invalid_session() -> BookingError {
        BookingError::Authentication("Invalid session".to_string())
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn verify(&self, token: &str) -> BookingResult<Identity> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                error!("Auth provider unreachable: {}", e);
                Self::invalid_session()
            })?;

        if !response.status().is_success() {
            warn!("Auth provider rejected token with status {}", response.status());
            return Err(Self::invalid_session());
        }

        let user: SupabaseUser = response.json().await.map_err(|e| {
            error!("Unexpected auth provider response: {}", e);
            Self::invalid_session()
        })?;

        let name = user
            .user_metadata
            .get("name")
            .and_then(|value| value.as_str())
            .map(str::to_string);

        Ok(Identity {
            id: user.id,
            email: user.email.unwrap_or_default(),
            name,
        })
    }
}

/// Authenticated caller, resolved from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError(BookingError::Authentication("Missing token".to_string())))?;

        let identity = state.auth.verify(token).await?;
        Ok(AuthUser(identity))
    }
}
